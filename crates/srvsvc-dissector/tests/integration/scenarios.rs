//! End-to-end decoding of complete request and response stubs.

use srvsvc_dissector::ops::{NETSHAREENUM, NET_SHARE_GET_INFO, NET_SRV_GET_INFO};
use srvsvc_dissector::profile::PUBLISHED;
use srvsvc_dissector::{Direction, Dissector, Exchange, Outcome};
use srvsvc_ndr::NdrError;

use crate::harness::{dissect, text, uint, StubBuilder, FIRST_REFERENT_ID};

/// Server info level 100 with a server name.
#[test]
fn test_server_info_100() {
    let frame = StubBuilder::new()
        .u32(100) // level
        .pointer() // arm
        .u32(500) // platform id
        .pointer() // server name
        .string("SRV01")
        .u32(0) // return code
        .frame(NET_SRV_GET_INFO, Direction::Response);

    let d = dissect(&frame);
    assert_eq!(d.outcome, Outcome::Decoded);
    assert_eq!(uint(&d, "srvsvc.info_level"), Some(100));
    assert_eq!(uint(&d, "srvsvc.info.platform_id"), Some(500));
    assert_eq!(text(&d, "srvsvc.server"), Some("SRV01"));
    assert_eq!(uint(&d, "srvsvc.rc"), Some(0));
    assert_eq!(d.offset, frame.data.len());
    assert_eq!(d.offset, 44);

    let container = d.tree.find_label("Server Info").unwrap();
    assert_eq!(container.range, 0..40);
}

/// Unmatched server info level: discriminant and pointer header only.
#[test]
fn test_server_info_unmatched_level() {
    let frame = StubBuilder::new()
        .u32(999)
        .pointer()
        .u32(0)
        .frame(NET_SRV_GET_INFO, Direction::Response);

    let d = dissect(&frame);
    assert_eq!(d.outcome, Outcome::Decoded);
    assert_eq!(uint(&d, "srvsvc.info_level"), Some(999));
    assert!(d.tree.find("srvsvc.info.platform_id").is_none());
    assert!(d.tree.find("srvsvc.server").is_none());

    let arm = d.tree.find_label("Info Level 999").unwrap();
    assert!(arm.children.is_empty());
    assert_eq!(d.tree.find_label("Server Info").unwrap().range, 0..8);
    // return code directly after the 8-byte container
    assert_eq!(d.tree.find("srvsvc.rc").unwrap().range, 8..12);
}

/// Unmatched server info level behind a null arm pointer is still legal.
#[test]
fn test_server_info_unmatched_level_null_arm() {
    let frame = StubBuilder::new()
        .u32(999)
        .null()
        .u32(0)
        .frame(NET_SRV_GET_INFO, Direction::Response);

    let d = dissect(&frame);
    assert_eq!(d.outcome, Outcome::Decoded);
    assert!(d.tree.find_label("Info Level 999").unwrap().is_null_pointer());
    assert_eq!(d.tree.find("srvsvc.rc").unwrap().range, 8..12);
    assert_eq!(d.offset, 12);
}

/// Share info level 1 with a null share name: both share type reads are
/// present and the comment follows the fixed part.
#[test]
fn test_share_info_level_1_null_name() {
    let frame = StubBuilder::new()
        .u32(1) // level
        .null() // share name
        .u32(0) // type
        .u32(0) // type, again
        .pointer() // comment
        .string("test comment")
        .u32(0)
        .frame(NET_SHARE_GET_INFO, Direction::Response);

    let mut exchange = Exchange::new();
    let d = Dissector::default().dissect(&frame, &mut exchange);
    assert_eq!(d.outcome, Outcome::Decoded);
    assert!(d.tree.find("srvsvc.share").is_none());
    assert!(d.tree.find_label("Share").unwrap().is_null_pointer());
    let types = d.tree.find_all("srvsvc.share_type");
    assert_eq!(types.len(), 2);
    assert!(types.iter().all(|t| t.as_u32() == Some(0)));
    assert_eq!(text(&d, "srvsvc.share_comment"), Some("test comment"));
    assert_eq!(d.offset, 64);
    assert_eq!(exchange.level(), Some(1));
}

/// Share info request followed by its response on the same exchange.
#[test]
fn test_share_get_info_exchange() {
    let request = StubBuilder::new()
        .null() // server
        .string("public") // share, inline
        .u32(1)
        .frame(NET_SHARE_GET_INFO, Direction::Request);

    let dissector = Dissector::default();
    let mut exchange = Exchange::new();
    let d = dissector.dissect(&request, &mut exchange);
    assert_eq!(d.outcome, Outcome::Decoded);
    assert!(d.tree.find_label("Server").unwrap().is_null_pointer());
    assert!(d.tree.find("srvsvc.server").is_none());
    assert_eq!(text(&d, "srvsvc.share"), Some("public"));
    assert_eq!(uint(&d, "srvsvc.info_level"), Some(1));
    assert_eq!(d.offset, 36);
    assert_eq!(exchange.requested_level(), Some(1));
    assert_eq!(exchange.opnum(), Some(NET_SHARE_GET_INFO));

    let response = StubBuilder::new()
        .u32(1)
        .pointer()
        .u32(0)
        .u32(0)
        .null()
        .string("public")
        .u32(0)
        .frame(NET_SHARE_GET_INFO, Direction::Response);
    let d = dissector.dissect(&response, &mut exchange);
    assert_eq!(d.outcome, Outcome::Decoded);
    assert_eq!(exchange.requested_level(), Some(1));
    assert_eq!(exchange.level(), Some(1));
    assert_eq!(text(&d, "srvsvc.share"), Some("public"));
    assert!(d.tree.find("srvsvc.share_comment").is_none());
}

/// Buffer ends inside the comment's conformance header.
#[test]
fn test_truncated_comment_keeps_preceding_fields() {
    let mut data = StubBuilder::new()
        .u32(1)
        .null()
        .u32(0x10)
        .u32(0x10)
        .pointer()
        .string("test comment")
        .u32(0)
        .build();
    data.truncate(26);
    let frame = srvsvc_dissector::Frame::new(data, NET_SHARE_GET_INFO, Direction::Response);

    let d = dissect(&frame);
    assert_eq!(
        d.outcome,
        Outcome::Malformed(NdrError::Truncated {
            offset: 24,
            needed: 4,
            available: 2
        })
    );
    assert_eq!(uint(&d, "srvsvc.info_level"), Some(1));
    assert_eq!(d.tree.find_all("srvsvc.share_type").len(), 2);
    assert!(d.tree.find_label("Comment").is_some());
    assert!(d.tree.find("srvsvc.share_comment").is_none());
    assert!(d.tree.find("srvsvc.rc").is_none());
    assert!(d.offset <= 26);
    assert!(d.diagnostic().unwrap().starts_with("Malformed packet: truncated buffer"));
}

/// Unknown opnum: nothing decoded, offset unchanged.
#[test]
fn test_unknown_opcode() {
    let frame = StubBuilder::new()
        .with_prefix(24)
        .u32(100)
        .frame(9999, Direction::Request);

    let mut exchange = Exchange::new();
    let d = Dissector::default().dissect(&frame, &mut exchange);
    assert_eq!(d.outcome, Outcome::UnknownOpcode);
    assert_eq!(d.offset, 24);
    assert_eq!(d.tree.field_count(), 0);
    assert!(d.tree.find_label("Unknown operation 9999").is_some());
    assert_eq!(exchange, Exchange::new());
}

#[test]
fn test_known_operation_without_decoder() {
    let frame = StubBuilder::new()
        .u32(1)
        .u32(2)
        .frame(NETSHAREENUM, Direction::Response);
    let d = dissect(&frame);
    assert_eq!(d.outcome, Outcome::NotDecoded);
    assert_eq!(d.offset, 0);
    assert_eq!(d.tree.len(), 1);
}

#[test]
fn test_server_info_request() {
    let frame = StubBuilder::new()
        .pointer()
        .string("\\\\SRV01")
        .u32(102)
        .frame(NET_SRV_GET_INFO, Direction::Request);
    let d = dissect(&frame);
    assert_eq!(d.outcome, Outcome::Decoded);
    assert_eq!(text(&d, "srvsvc.server"), Some("\\\\SRV01"));
    assert_eq!(uint(&d, "srvsvc.info_level"), Some(102));
    let server = d.tree.find_label("Server").unwrap();
    assert_eq!(server.as_u32(), None);
    assert_eq!(server.range.start, 0);
}

#[test]
fn test_body_alignment_is_relative_to_stub_start() {
    let frame = StubBuilder::new()
        .with_prefix(2)
        .null()
        .u32(100)
        .frame(NET_SRV_GET_INFO, Direction::Request);
    let d = dissect(&frame);
    assert_eq!(d.outcome, Outcome::Decoded);
    assert_eq!(d.tree.find_label("Server").unwrap().range, 4..8);
    assert_eq!(d.offset, 12);
    assert_eq!(d.consumed(), 10);
}

#[test]
fn test_server_info_101_big_endian() {
    let frame = StubBuilder::big_endian()
        .u32(101)
        .pointer()
        .u32(500)
        .pointer() // full pointer to server name
        .u32(5)
        .u32(2)
        .u32(0x0000_9003)
        .pointer()
        .string("FILESRV")
        .string("Main office")
        .u32(0)
        .frame(NET_SRV_GET_INFO, Direction::Response);

    let d = dissect(&frame);
    assert_eq!(d.outcome, Outcome::Decoded);
    assert_eq!(uint(&d, "srvsvc.version.major"), Some(5));
    assert_eq!(uint(&d, "srvsvc.version.minor"), Some(2));
    assert_eq!(uint(&d, "srvsvc.server.type"), Some(0x9003));
    assert_eq!(text(&d, "srvsvc.server"), Some("FILESRV"));
    assert_eq!(text(&d, "srvsvc.server.comment"), Some("Main office"));
    assert_eq!(d.offset, frame.data.len());
}

#[test]
fn test_server_info_102_legacy_user_path() {
    let frame = StubBuilder::new()
        .u32(102)
        .pointer()
        .u32(500)
        .null()
        .u32(4)
        .u32(0)
        .u32(3)
        .null()
        .u32(17) // users
        .u32(0) // hidden
        .pointer()
        .string("C:\\")
        .u32(0)
        .frame(NET_SRV_GET_INFO, Direction::Response);

    let d = dissect(&frame);
    assert_eq!(d.outcome, Outcome::Decoded);
    assert_eq!(uint(&d, "srvsvc.users"), Some(17));
    assert_eq!(uint(&d, "srvsvc.hidden"), Some(0));
    assert_eq!(text(&d, "srvsvc.user_path"), Some("C:\\"));
    assert!(d.tree.find("srvsvc.announce").is_none());
}

#[test]
fn test_null_server_info_arm_is_malformed() {
    let frame = StubBuilder::new()
        .u32(100)
        .null()
        .u32(0)
        .frame(NET_SRV_GET_INFO, Direction::Response);
    let d = dissect(&frame);
    assert_eq!(d.outcome, Outcome::Malformed(NdrError::NullReference { offset: 4 }));
    assert_eq!(uint(&d, "srvsvc.info_level"), Some(100));
    assert!(d.tree.find("srvsvc.rc").is_none());
}

#[test]
fn test_published_share_info_1() {
    let frame = StubBuilder::new()
        .u32(1)
        .pointer() // union arm
        .pointer() // share name
        .u32(0x8000_0003)
        .null() // comment
        .string("IPC$")
        .u32(0)
        .frame(NET_SHARE_GET_INFO, Direction::Response);

    let d = Dissector::new(&PUBLISHED).dissect(&frame, &mut Exchange::new());
    assert_eq!(d.outcome, Outcome::Decoded);
    let types = d.tree.find_all("srvsvc.share_type");
    assert_eq!(types.len(), 1);
    assert_eq!(types[0].as_u32(), Some(0x8000_0003));
    assert_eq!(text(&d, "srvsvc.share"), Some("IPC$"));
    let arm = d.tree.find_label("Share Info Level 1").unwrap();
    assert_eq!(arm.value, Some(srvsvc_ndr::FieldValue::Referent(FIRST_REFERENT_ID)));
    assert_eq!(d.offset, frame.data.len());
}

#[test]
fn test_published_share_info_2() {
    let frame = StubBuilder::new()
        .u32(2)
        .pointer()
        .pointer() // name
        .u32(0)
        .pointer() // remark
        .u32(0x7F)
        .u32(u32::MAX)
        .u32(3)
        .pointer() // path
        .null() // password
        .string("data")
        .string("team data")
        .string("D:\\data")
        .u32(0)
        .frame(NET_SHARE_GET_INFO, Direction::Response);

    let d = Dissector::new(&PUBLISHED).dissect(&frame, &mut Exchange::new());
    assert_eq!(d.outcome, Outcome::Decoded);
    assert_eq!(text(&d, "srvsvc.share"), Some("data"));
    assert_eq!(text(&d, "srvsvc.share_comment"), Some("team data"));
    assert_eq!(text(&d, "srvsvc.share.path"), Some("D:\\data"));
    assert_eq!(uint(&d, "srvsvc.share.max_uses"), Some(u32::MAX));
    assert_eq!(uint(&d, "srvsvc.share.current_uses"), Some(3));
    assert!(d.tree.find_label("Password").unwrap().is_null_pointer());
    assert_eq!(d.offset, frame.data.len());
}

#[test]
fn test_published_server_info_102() {
    let frame = StubBuilder::new()
        .u32(102)
        .pointer()
        .u32(500)
        .pointer()
        .u32(10)
        .u32(0)
        .u32(0x0084_9a03)
        .null()
        .u32(4) // users
        .u32(15) // disc
        .u32(0) // hidden
        .u32(240) // announce
        .u32(3000) // anndelta
        .u32(0) // licenses
        .null() // userpath
        .string("DC01")
        .u32(0)
        .frame(NET_SRV_GET_INFO, Direction::Response);

    let d = Dissector::new(&PUBLISHED).dissect(&frame, &mut Exchange::new());
    assert_eq!(d.outcome, Outcome::Decoded);
    assert_eq!(uint(&d, "srvsvc.disc"), Some(15));
    assert_eq!(uint(&d, "srvsvc.announce"), Some(240));
    assert_eq!(uint(&d, "srvsvc.ann_delta"), Some(3000));
    assert_eq!(text(&d, "srvsvc.server"), Some("DC01"));
    assert_eq!(d.offset, frame.data.len());
}

#[test]
fn test_json_rendering_of_decoded_tree() {
    let frame = StubBuilder::new()
        .null()
        .u32(100)
        .frame(NET_SRV_GET_INFO, Direction::Request);
    let d = dissect(&frame);
    let json = d.tree.to_json();
    assert_eq!(json["children"][0]["label"], "Server");
    assert_eq!(json["children"][0]["value"]["type"], "null");
    assert_eq!(json["children"][1]["field"], "srvsvc.info_level");
}
