//! Field registry for SRVSVC.
//!
//! Every field the dissector can emit is a static [`FieldInfo`] listed in
//! [`FIELDS`]. Filter names are unique.

use srvsvc_ndr::{Base, FieldInfo, FieldKind};

const fn uint32(name: &'static str, abbrev: &'static str, base: Base, blurb: &'static str) -> FieldInfo {
    FieldInfo {
        name,
        abbrev,
        kind: FieldKind::Uint32,
        base,
        blurb,
    }
}

const fn string(name: &'static str, abbrev: &'static str, blurb: &'static str) -> FieldInfo {
    FieldInfo {
        name,
        abbrev,
        kind: FieldKind::String,
        base: Base::None,
        blurb,
    }
}

pub static SERVER: FieldInfo = string("Server", "srvsvc.server", "Server Name");
pub static INFO_LEVEL: FieldInfo = uint32("Info Level", "srvsvc.info_level", Base::Dec, "Info Level");
pub static RC: FieldInfo = uint32("Return code", "srvsvc.rc", Base::Dec, "Return Code");

// server-info
pub static PLATFORM_ID: FieldInfo =
    uint32("Platform id", "srvsvc.info.platform_id", Base::Hex, "Platform ID");
pub static VER_MAJOR: FieldInfo =
    uint32("Major Version", "srvsvc.version.major", Base::Dec, "Major Version");
pub static VER_MINOR: FieldInfo =
    uint32("Minor Version", "srvsvc.version.minor", Base::Dec, "Minor Version");
pub static SERVER_TYPE: FieldInfo =
    uint32("Server Type", "srvsvc.server.type", Base::Hex, "Server Type");
pub static SERVER_COMMENT: FieldInfo =
    string("Server Comment", "srvsvc.server.comment", "Server Comment String");
pub static USERS: FieldInfo = uint32("Users", "srvsvc.users", Base::Dec, "User Count");
pub static DISC: FieldInfo =
    uint32("Disconnect Time", "srvsvc.disc", Base::Dec, "Auto-disconnect Time (minutes)");
pub static HIDDEN: FieldInfo = uint32("Hidden", "srvsvc.hidden", Base::Dec, "Hidden");
pub static ANNOUNCE: FieldInfo = uint32("Announce", "srvsvc.announce", Base::Dec, "Announce");
pub static ANN_DELTA: FieldInfo =
    uint32("Announce Delta", "srvsvc.ann_delta", Base::Dec, "Announce Delta");
pub static LICENCES: FieldInfo = uint32("Licences", "srvsvc.licences", Base::Dec, "Licences");
pub static USER_PATH: FieldInfo = string("User Path", "srvsvc.user_path", "User Path");

// share-info
pub static SHARE: FieldInfo = string("Share", "srvsvc.share", "Share");
pub static SHARE_TYPE: FieldInfo = uint32("Share Type", "srvsvc.share_type", Base::Hex, "Share Type");
pub static SHARE_COMMENT: FieldInfo = string("Share Comment", "srvsvc.share_comment", "Share Comment");
pub static PERMISSIONS: FieldInfo =
    uint32("Permissions", "srvsvc.share.permissions", Base::Hex, "Share Permissions");
pub static MAX_USES: FieldInfo =
    uint32("Max Uses", "srvsvc.share.max_uses", Base::Dec, "Maximum Concurrent Uses");
pub static CURRENT_USES: FieldInfo =
    uint32("Current Uses", "srvsvc.share.current_uses", Base::Dec, "Current Uses");
pub static PATH: FieldInfo = string("Path", "srvsvc.share.path", "Local Path");
pub static PASSWORD: FieldInfo = string("Password", "srvsvc.share.password", "Share Password");

pub static FIELDS: &[&FieldInfo] = &[
    &SERVER,
    &INFO_LEVEL,
    &RC,
    &PLATFORM_ID,
    &VER_MAJOR,
    &VER_MINOR,
    &SERVER_TYPE,
    &SERVER_COMMENT,
    &USERS,
    &DISC,
    &HIDDEN,
    &ANNOUNCE,
    &ANN_DELTA,
    &LICENCES,
    &USER_PATH,
    &SHARE,
    &SHARE_TYPE,
    &SHARE_COMMENT,
    &PERMISSIONS,
    &MAX_USES,
    &CURRENT_USES,
    &PATH,
    &PASSWORD,
];

/// Looks up a field by filter name.
pub fn lookup(abbrev: &str) -> Option<&'static FieldInfo> {
    FIELDS.iter().copied().find(|f| f.abbrev == abbrev)
}
