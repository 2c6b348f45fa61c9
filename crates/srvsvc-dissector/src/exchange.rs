//! Per-exchange state shared between a request and its response.
//!
//! An [`Exchange`] belongs to one request/response pair on one association
//! and is owned by the caller. Decoding the request writes into it, decoding
//! the response reads from it. Nothing here is global: two exchanges decoded
//! on two threads never see each other.

use crate::info::ShareInfoLevel;

/// State carried from one frame of an exchange to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exchange {
    opnum: Option<u16>,
    requested_level: Option<u32>,
    level: Option<u32>,
}

impl Exchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operation this exchange is bound to, once a frame has been decoded.
    pub fn opnum(&self) -> Option<u16> {
        self.opnum
    }

    /// Binds the exchange to `opnum`. State left by a different operation is
    /// dropped.
    pub fn bind(&mut self, opnum: u16) {
        if self.opnum != Some(opnum) {
            if self.opnum.is_some() {
                tracing::debug!(
                    from = ?self.opnum,
                    to = opnum,
                    "exchange: rebound to another operation, state cleared"
                );
            }
            *self = Self {
                opnum: Some(opnum),
                ..Self::default()
            };
        }
    }

    /// Info level asked for by the request.
    pub fn requested_level(&self) -> Option<u32> {
        self.requested_level
    }

    pub fn set_requested_level(&mut self, level: u32) {
        self.requested_level = Some(level);
    }

    /// Info level the structure decoder selects its variant from.
    pub fn level(&self) -> Option<u32> {
        self.level
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = Some(level);
    }

    /// Share-info variant selected by the stored level. With no level stored
    /// nothing is selected.
    pub fn share_level(&self) -> ShareInfoLevel {
        self.level.map_or(ShareInfoLevel::Unknown(0), ShareInfoLevel::from)
    }
}
