//! Level-switched info structures and their containers.

use srvsvc_ndr::pointer::{emit_deferred, emit_embedded, scan_deferred, scan_embedded};
use srvsvc_ndr::{
    Cursor, FieldInfo, FieldTree, FieldValue, Layout, Member, NodeId, PointerKind, Referent, Scan,
    U32_ALIGN,
};

use crate::fields;
use crate::profile::LayoutProfile;

/// Discriminant of the server-info union.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerInfoLevel {
    L100,
    L101,
    L102,
    Unknown(u32),
}

impl From<u32> for ServerInfoLevel {
    fn from(level: u32) -> Self {
        match level {
            100 => ServerInfoLevel::L100,
            101 => ServerInfoLevel::L101,
            102 => ServerInfoLevel::L102,
            other => ServerInfoLevel::Unknown(other),
        }
    }
}

impl ServerInfoLevel {
    pub fn value(self) -> u32 {
        match self {
            ServerInfoLevel::L100 => 100,
            ServerInfoLevel::L101 => 101,
            ServerInfoLevel::L102 => 102,
            ServerInfoLevel::Unknown(other) => other,
        }
    }
}

/// Discriminant of the share-info union.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareInfoLevel {
    L1,
    L2,
    Unknown(u32),
}

impl From<u32> for ShareInfoLevel {
    fn from(level: u32) -> Self {
        match level {
            1 => ShareInfoLevel::L1,
            2 => ShareInfoLevel::L2,
            other => ShareInfoLevel::Unknown(other),
        }
    }
}

impl ShareInfoLevel {
    pub fn value(self) -> u32 {
        match self {
            ShareInfoLevel::L1 => 1,
            ShareInfoLevel::L2 => 2,
            ShareInfoLevel::Unknown(other) => other,
        }
    }
}

const fn scalar(field: &'static FieldInfo) -> Member {
    Member::Uint32(field)
}

const fn unique(label: &'static str, field: &'static FieldInfo) -> Member {
    Member::Pointer {
        kind: PointerKind::Unique,
        label,
        field,
    }
}

const fn full(label: &'static str, field: &'static FieldInfo) -> Member {
    Member::Pointer {
        kind: PointerKind::Full,
        label,
        field,
    }
}

pub static SERVER_INFO_100: Layout = Layout {
    name: "SERVER_INFO_100",
    members: &[scalar(&fields::PLATFORM_ID), unique("Server", &fields::SERVER)],
};

pub static LEGACY_SERVER_INFO_101: Layout = Layout {
    name: "SERVER_INFO_101",
    members: &[
        scalar(&fields::PLATFORM_ID),
        full("Server", &fields::SERVER),
        scalar(&fields::VER_MAJOR),
        scalar(&fields::VER_MINOR),
        scalar(&fields::SERVER_TYPE),
        unique("Comment", &fields::SERVER_COMMENT),
    ],
};

pub static LEGACY_SERVER_INFO_102: Layout = Layout {
    name: "SERVER_INFO_102",
    members: &[
        scalar(&fields::PLATFORM_ID),
        full("Server", &fields::SERVER),
        scalar(&fields::VER_MAJOR),
        scalar(&fields::VER_MINOR),
        scalar(&fields::SERVER_TYPE),
        unique("Comment", &fields::SERVER_COMMENT),
        scalar(&fields::USERS),
        scalar(&fields::HIDDEN),
        unique("User Path", &fields::USER_PATH),
    ],
};

/// Reads the share type twice.
pub static LEGACY_SHARE_INFO_1: Layout = Layout {
    name: "SHARE_INFO_1",
    members: &[
        unique("Share", &fields::SHARE),
        scalar(&fields::SHARE_TYPE),
        scalar(&fields::SHARE_TYPE),
        unique("Comment", &fields::SHARE_COMMENT),
    ],
};

pub static LEGACY_SHARE_INFO_2: Layout = Layout {
    name: "SHARE_INFO_2",
    members: &[],
};

pub static SERVER_INFO_101: Layout = Layout {
    name: "SERVER_INFO_101",
    members: &[
        scalar(&fields::PLATFORM_ID),
        unique("Server", &fields::SERVER),
        scalar(&fields::VER_MAJOR),
        scalar(&fields::VER_MINOR),
        scalar(&fields::SERVER_TYPE),
        unique("Comment", &fields::SERVER_COMMENT),
    ],
};

pub static SERVER_INFO_102: Layout = Layout {
    name: "SERVER_INFO_102",
    members: &[
        scalar(&fields::PLATFORM_ID),
        unique("Server", &fields::SERVER),
        scalar(&fields::VER_MAJOR),
        scalar(&fields::VER_MINOR),
        scalar(&fields::SERVER_TYPE),
        unique("Comment", &fields::SERVER_COMMENT),
        scalar(&fields::USERS),
        scalar(&fields::DISC),
        scalar(&fields::HIDDEN),
        scalar(&fields::ANNOUNCE),
        scalar(&fields::ANN_DELTA),
        scalar(&fields::LICENCES),
        unique("User Path", &fields::USER_PATH),
    ],
};

pub static SHARE_INFO_1: Layout = Layout {
    name: "SHARE_INFO_1",
    members: &[
        unique("Share", &fields::SHARE),
        scalar(&fields::SHARE_TYPE),
        unique("Comment", &fields::SHARE_COMMENT),
    ],
};

pub static SHARE_INFO_2: Layout = Layout {
    name: "SHARE_INFO_2",
    members: &[
        unique("Share", &fields::SHARE),
        scalar(&fields::SHARE_TYPE),
        unique("Comment", &fields::SHARE_COMMENT),
        scalar(&fields::PERMISSIONS),
        scalar(&fields::MAX_USES),
        scalar(&fields::CURRENT_USES),
        unique("Path", &fields::PATH),
        unique("Password", &fields::PASSWORD),
    ],
};

/// `SVR_INFO_CTR`: info level followed by a pointer to the selected variant.
///
/// The pointer header is consumed for every level. Unknown levels emit the
/// header and nothing behind it.
#[derive(Debug, Clone, Copy)]
pub struct ServerInfoContainer {
    pub profile: &'static LayoutProfile,
}

impl Referent for ServerInfoContainer {
    fn scan(&self, cur: &mut Cursor<'_>, scan: &mut Scan) -> srvsvc_ndr::Result<()> {
        let layout = self.profile.server_layout(ServerInfoLevel::from(cur.read_u32()?));
        scan_embedded(cur, self.arm_kind(layout), scan)?;
        match layout {
            Some(layout) => scan_deferred(layout, cur, scan, 0),
            None => Ok(()),
        }
    }

    fn emit(
        &self,
        cur: &mut Cursor<'_>,
        scan: &Scan,
        tree: &mut FieldTree,
        parent: NodeId,
    ) -> srvsvc_ndr::Result<()> {
        let start = cur.aligned(U32_ALIGN);
        let node = tree.add_item(parent, "Server Info", None, start..start);
        let result = self.emit_body(cur, scan, tree, node);
        tree.extend_to(node, cur.offset());
        result
    }
}

impl ServerInfoContainer {
    /// Arm pointer kind for a level. A level without a variant has no arm to
    /// require, so its header is read as nullable.
    fn arm_kind(&self, layout: Option<&Layout>) -> PointerKind {
        match layout {
            Some(_) => self.profile.server_arm,
            None => PointerKind::Unique,
        }
    }

    fn emit_body(
        &self,
        cur: &mut Cursor<'_>,
        scan: &Scan,
        tree: &mut FieldTree,
        node: NodeId,
    ) -> srvsvc_ndr::Result<()> {
        let at = cur.aligned(U32_ALIGN);
        let raw = cur.read_u32()?;
        tree.add_field(node, &fields::INFO_LEVEL, FieldValue::Uint32(raw), at..cur.offset());
        let layout = self.profile.server_layout(ServerInfoLevel::from(raw));
        let label = format!("Info Level {raw}");
        let (arm, id) = emit_embedded(cur, self.arm_kind(layout), &label, scan, 0, tree, node)?;
        match layout {
            Some(layout) => emit_deferred(layout, cur, scan, 0, id, tree, arm),
            None => {
                tracing::debug!(level = raw, "srvsvc: no server-info variant for level");
                Ok(())
            }
        }
    }
}

/// Share-info structure. The level is not on the wire at this point; the
/// caller hands over the one it read from the response body.
#[derive(Debug, Clone, Copy)]
pub struct ShareInfoContainer {
    pub level: ShareInfoLevel,
    pub profile: &'static LayoutProfile,
}

impl Referent for ShareInfoContainer {
    fn scan(&self, cur: &mut Cursor<'_>, scan: &mut Scan) -> srvsvc_ndr::Result<()> {
        let Some(layout) = self.profile.share_layout(self.level) else {
            return Ok(());
        };
        match self.profile.share_arm {
            Some(kind) => {
                scan_embedded(cur, kind, scan)?;
                scan_deferred(layout, cur, scan, 0)
            }
            None => layout.scan(cur, scan),
        }
    }

    fn emit(
        &self,
        cur: &mut Cursor<'_>,
        scan: &Scan,
        tree: &mut FieldTree,
        parent: NodeId,
    ) -> srvsvc_ndr::Result<()> {
        let Some(layout) = self.profile.share_layout(self.level) else {
            tracing::debug!(level = self.level.value(), "srvsvc: no share-info variant for level");
            return Ok(());
        };
        match self.profile.share_arm {
            Some(kind) => {
                let label = format!("Share Info Level {}", self.level.value());
                let (arm, id) = emit_embedded(cur, kind, &label, scan, 0, tree, parent)?;
                emit_deferred(layout, cur, scan, 0, id, tree, arm)
            }
            None => layout.emit(cur, scan, tree, parent),
        }
    }
}
