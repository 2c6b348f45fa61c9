//! Layout profiles -- named sets of structure layouts.
//!
//! Two field orders are seen for the same info levels. `legacy` matches what
//! deployed decoders have always produced: a short `SERVER_INFO_102`, a
//! full pointer for the 101/102 server name, the share type read twice in
//! `SHARE_INFO_1` and no union-arm pointer in front of the share structure.
//! `published` follows the MS-SRVS IDL.
//!
//! A dissector is built for exactly one profile.

use srvsvc_ndr::{Layout, PointerKind};

use crate::info::{self, ServerInfoLevel, ShareInfoLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutProfile {
    /// Name used in configuration.
    pub name: &'static str,

    // -- server-info --
    pub server_100: &'static Layout,
    pub server_101: &'static Layout,
    pub server_102: &'static Layout,
    /// Pointer kind of the container's arm pointer.
    pub server_arm: PointerKind,

    // -- share-info --
    pub share_1: &'static Layout,
    pub share_2: &'static Layout,
    /// Union-arm pointer in front of the share structure, if any.
    pub share_arm: Option<PointerKind>,
}

impl LayoutProfile {
    pub fn server_layout(&self, level: ServerInfoLevel) -> Option<&'static Layout> {
        match level {
            ServerInfoLevel::L100 => Some(self.server_100),
            ServerInfoLevel::L101 => Some(self.server_101),
            ServerInfoLevel::L102 => Some(self.server_102),
            ServerInfoLevel::Unknown(_) => None,
        }
    }

    pub fn share_layout(&self, level: ShareInfoLevel) -> Option<&'static Layout> {
        match level {
            ShareInfoLevel::L1 => Some(self.share_1),
            ShareInfoLevel::L2 => Some(self.share_2),
            ShareInfoLevel::Unknown(_) => None,
        }
    }
}

pub static LEGACY: LayoutProfile = LayoutProfile {
    name: "legacy",
    server_100: &info::SERVER_INFO_100,
    server_101: &info::LEGACY_SERVER_INFO_101,
    server_102: &info::LEGACY_SERVER_INFO_102,
    server_arm: PointerKind::Ref,
    share_1: &info::LEGACY_SHARE_INFO_1,
    share_2: &info::LEGACY_SHARE_INFO_2,
    share_arm: None,
};

pub static PUBLISHED: LayoutProfile = LayoutProfile {
    name: "published",
    server_100: &info::SERVER_INFO_100,
    server_101: &info::SERVER_INFO_101,
    server_102: &info::SERVER_INFO_102,
    server_arm: PointerKind::Unique,
    share_1: &info::SHARE_INFO_1,
    share_2: &info::SHARE_INFO_2,
    share_arm: Some(PointerKind::Unique),
};

pub static PROFILES: &[&LayoutProfile] = &[&LEGACY, &PUBLISHED];

/// Profile used when none is configured.
pub fn default_profile() -> &'static LayoutProfile {
    &LEGACY
}

pub fn by_name(name: &str) -> Option<&'static LayoutProfile> {
    PROFILES
        .iter()
        .copied()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}
