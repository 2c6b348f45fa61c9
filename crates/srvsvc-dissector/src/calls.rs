//! Request and response body decoders.

use srvsvc_ndr::{
    decode_pointer, ConformantString, Cursor, FieldInfo, FieldTree, FieldValue, NodeId,
    PointerKind, Referent, Result, U32_ALIGN,
};

use crate::exchange::Exchange;
use crate::fields;
use crate::info::{ServerInfoContainer, ShareInfoContainer};
use crate::profile::LayoutProfile;

/// Decodes one body, reading from `body.cur` and emitting under
/// `body.parent`.
pub type BodyDecoder = fn(&mut Body<'_>) -> Result<()>;

/// Everything a body decoder works on.
pub struct Body<'a> {
    pub cur: Cursor<'a>,
    pub tree: FieldTree,
    pub parent: NodeId,
    pub exchange: &'a mut Exchange,
    pub profile: &'static LayoutProfile,
}

impl Body<'_> {
    fn uint32(&mut self, field: &'static FieldInfo) -> Result<u32> {
        let start = self.cur.aligned(U32_ALIGN);
        let value = self.cur.read_u32()?;
        self.tree
            .add_field(self.parent, field, FieldValue::Uint32(value), start..self.cur.offset());
        Ok(value)
    }

    fn pointer<R: Referent>(&mut self, kind: PointerKind, label: &str, referent: &R) -> Result<NodeId> {
        decode_pointer(&mut self.cur, &mut self.tree, self.parent, kind, label, referent)
    }
}

static SERVER_NAME: ConformantString = ConformantString {
    field: &fields::SERVER,
};

static SHARE_NAME: ConformantString = ConformantString {
    field: &fields::SHARE,
};

/// `NetrServerGetInfo` request: `[in, unique] server`, `[in] level`.
pub fn srv_get_info_request(body: &mut Body<'_>) -> Result<()> {
    body.pointer(PointerKind::Unique, "Server", &SERVER_NAME)?;
    let level = body.uint32(&fields::INFO_LEVEL)?;
    body.exchange.set_requested_level(level);
    Ok(())
}

/// `NetrServerGetInfo` response: `[out, ref] SVR_INFO_CTR`, return code.
pub fn srv_get_info_response(body: &mut Body<'_>) -> Result<()> {
    let container = ServerInfoContainer {
        profile: body.profile,
    };
    body.pointer(PointerKind::Ref, "Info", &container)?;
    body.uint32(&fields::RC)?;
    Ok(())
}

/// `NetrShareGetInfo` request: `[in, unique] server`, `[in, ref] share`,
/// `[in] level`. The level is kept for the response.
pub fn share_get_info_request(body: &mut Body<'_>) -> Result<()> {
    body.pointer(PointerKind::Unique, "Server", &SERVER_NAME)?;
    body.pointer(PointerKind::Ref, "Share", &SHARE_NAME)?;
    let level = body.uint32(&fields::INFO_LEVEL)?;
    body.exchange.set_requested_level(level);
    tracing::debug!(level, "srvsvc: share info requested");
    Ok(())
}

/// `NetrShareGetInfo` response: level, `[out, ref]` share info, return code.
pub fn share_get_info_response(body: &mut Body<'_>) -> Result<()> {
    let level = body.uint32(&fields::INFO_LEVEL)?;
    if let Some(requested) = body.exchange.requested_level() {
        if requested != level {
            tracing::debug!(requested, level, "srvsvc: response level differs from request");
        }
    }
    body.exchange.set_level(level);

    let container = ShareInfoContainer {
        level: body.exchange.share_level(),
        profile: body.profile,
    };
    body.pointer(PointerKind::Ref, "Info", &container)?;
    body.uint32(&fields::RC)?;
    Ok(())
}
