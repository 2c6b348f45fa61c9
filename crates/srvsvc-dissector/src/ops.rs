//! Operation table.
//!
//! Every SRVSVC opnum this dissector recognises, with the body decoders that
//! exist for it. A recognised operation without a decoder is reported as
//! "not decoded", which is different from an opnum missing from the table.

use crate::calls::{self, BodyDecoder};
use crate::Direction;

pub const NETCONNENUM: u16 = 8;
pub const NETFILEENUM: u16 = 9;
pub const NETSESSENUM: u16 = 12;
pub const NET_SHARE_ADD: u16 = 14;
pub const NETSHAREENUM_ALL: u16 = 15;
pub const NET_SHARE_GET_INFO: u16 = 16;
pub const NET_SHARE_SET_INFO: u16 = 17;
pub const NET_SHARE_DEL: u16 = 18;
pub const NET_SRV_GET_INFO: u16 = 21;
pub const NET_SRV_SET_INFO: u16 = 22;
pub const NET_DISK_ENUM: u16 = 23;
pub const NET_REMOTE_TOD: u16 = 28;
pub const NET_NAME_VALIDATE: u16 = 33;
pub const NETSHAREENUM: u16 = 36;
pub const NETFILEQUERYSECDESC: u16 = 39;
pub const NETFILESETSECDESC: u16 = 40;

#[derive(Debug, Clone, Copy)]
pub struct Operation {
    pub opnum: u16,
    pub name: &'static str,
    pub request: Option<BodyDecoder>,
    pub response: Option<BodyDecoder>,
}

impl Operation {
    const fn recognised(opnum: u16, name: &'static str) -> Self {
        Self {
            opnum,
            name,
            request: None,
            response: None,
        }
    }

    pub fn decoder(&self, direction: Direction) -> Option<BodyDecoder> {
        match direction {
            Direction::Request => self.request,
            Direction::Response => self.response,
        }
    }

    pub fn is_decoded(&self, direction: Direction) -> bool {
        self.decoder(direction).is_some()
    }
}

pub static OPERATIONS: &[Operation] = &[
    Operation::recognised(NETCONNENUM, "NETCONNENUM"),
    Operation::recognised(NETFILEENUM, "NETFILEENUM"),
    Operation::recognised(NETSESSENUM, "NETSESSENUM"),
    Operation::recognised(NET_SHARE_ADD, "NET_SHARE_ADD"),
    Operation::recognised(NETSHAREENUM_ALL, "NETSHAREENUM_ALL"),
    Operation {
        opnum: NET_SHARE_GET_INFO,
        name: "NET_SHARE_GET_INFO",
        request: Some(calls::share_get_info_request),
        response: Some(calls::share_get_info_response),
    },
    Operation::recognised(NET_SHARE_SET_INFO, "NET_SHARE_SET_INFO"),
    Operation::recognised(NET_SHARE_DEL, "NET_SHARE_DEL"),
    Operation {
        opnum: NET_SRV_GET_INFO,
        name: "NET_SRV_GET_INFO",
        request: Some(calls::srv_get_info_request),
        response: Some(calls::srv_get_info_response),
    },
    Operation::recognised(NET_SRV_SET_INFO, "NET_SRV_SET_INFO"),
    Operation::recognised(NET_DISK_ENUM, "NET_DISK_ENUM"),
    Operation::recognised(NET_REMOTE_TOD, "NET_REMOTE_TOD"),
    Operation::recognised(NET_NAME_VALIDATE, "NET_NAME_VALIDATE"),
    Operation::recognised(NETSHAREENUM, "NETSHAREENUM"),
    Operation::recognised(NETFILEQUERYSECDESC, "NETFILEQUERYSECDESC"),
    Operation::recognised(NETFILESETSECDESC, "NETFILESETSECDESC"),
];

pub fn lookup(opnum: u16) -> Option<&'static Operation> {
    OPERATIONS.iter().find(|op| op.opnum == opnum)
}
