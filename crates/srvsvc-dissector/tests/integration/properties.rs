//! Property tests over arbitrary and generated stubs.

use proptest::prelude::*;
use srvsvc_dissector::ops::{NET_SHARE_GET_INFO, NET_SRV_GET_INFO};
use srvsvc_dissector::profile::{LEGACY, PUBLISHED};
use srvsvc_dissector::{Direction, Dissector, Exchange, Frame, Outcome};

use crate::harness::StubBuilder;

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Request), Just(Direction::Response)]
}

fn opnum() -> impl Strategy<Value = u16> {
    prop_oneof![
        Just(NET_SHARE_GET_INFO),
        Just(NET_SRV_GET_INFO),
        Just(15u16),
        any::<u16>(),
    ]
}

fn dissector() -> impl Strategy<Value = Dissector> {
    prop_oneof![Just(Dissector::new(&LEGACY)), Just(Dissector::new(&PUBLISHED))]
}

proptest! {
    #[test]
    fn prop_decoding_is_deterministic(
        data in proptest::collection::vec(any::<u8>(), 0..128),
        opnum in opnum(),
        direction in direction(),
        dissector in dissector(),
    ) {
        let frame = Frame::new(data, opnum, direction);
        let first = dissector.dissect(&frame, &mut Exchange::new());
        let second = dissector.dissect(&frame, &mut Exchange::new());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_offset_stays_in_bounds(
        data in proptest::collection::vec(any::<u8>(), 0..128),
        start in 0usize..128,
        opnum in opnum(),
        direction in direction(),
        dissector in dissector(),
    ) {
        let start = start.min(data.len());
        let len = data.len();
        let frame = Frame::new(data, opnum, direction).with_offset(start);
        let d = dissector.dissect(&frame, &mut Exchange::new());
        prop_assert!(d.offset >= start);
        prop_assert!(d.offset <= len);
    }

    #[test]
    fn prop_null_server_pointer_is_four_bytes(level in any::<u32>()) {
        let frame = StubBuilder::new()
            .null()
            .u32(level)
            .frame(NET_SRV_GET_INFO, Direction::Request);
        let d = Dissector::default().dissect(&frame, &mut Exchange::new());
        prop_assert_eq!(d.outcome, Outcome::Decoded);
        let server = d.tree.find_label("Server").unwrap();
        prop_assert_eq!(server.range.clone(), 0..4);
        prop_assert!(server.children.is_empty());
        prop_assert_eq!(d.offset, 8);
    }

    #[test]
    fn prop_unknown_server_level_consumes_eight_bytes(
        level in any::<u32>().prop_filter("known level", |l| !(100..=102).contains(l)),
        referent_id in any::<u32>(),
        trailing in proptest::collection::vec(any::<u8>(), 4..32),
    ) {
        let mut data = StubBuilder::new().u32(level).u32(referent_id).build();
        data.extend(trailing);
        let frame = Frame::new(data, NET_SRV_GET_INFO, Direction::Response);
        let d = Dissector::default().dissect(&frame, &mut Exchange::new());
        prop_assert_eq!(d.outcome, Outcome::Decoded);
        prop_assert_eq!(d.tree.find_label("Server Info").unwrap().range.clone(), 0..8);
        prop_assert!(d.tree.find("srvsvc.info.platform_id").is_none());
        // container plus return code
        prop_assert_eq!(d.offset, 12);
    }

    #[test]
    fn prop_share_info_1_round_trips_strings(
        name in proptest::option::of("[A-Za-z0-9$]{1,12}"),
        comment in proptest::option::of("[ -~]{0,40}"),
        share_type in any::<u32>(),
    ) {
        let mut stub = StubBuilder::new().u32(1);
        stub = if name.is_some() { stub.pointer() } else { stub.null() };
        stub = stub.u32(share_type).u32(share_type);
        stub = if comment.is_some() { stub.pointer() } else { stub.null() };
        for text in [&name, &comment].into_iter().flatten() {
            stub = stub.string(text);
        }
        let frame = stub.u32(0).frame(NET_SHARE_GET_INFO, Direction::Response);
        let d = Dissector::default().dissect(&frame, &mut Exchange::new());
        prop_assert_eq!(&d.outcome, &Outcome::Decoded);
        prop_assert_eq!(d.offset, frame.data.len());
        prop_assert_eq!(
            d.tree.find("srvsvc.share").and_then(|n| n.as_text()),
            name.as_deref()
        );
        prop_assert_eq!(
            d.tree.find("srvsvc.share_comment").and_then(|n| n.as_text()),
            comment.as_deref()
        );
    }
}
