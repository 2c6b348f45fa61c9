//! Independent exchanges decoded on separate threads.

use std::thread;

use srvsvc_dissector::ops::NET_SHARE_GET_INFO;
use srvsvc_dissector::{Direction, Dissector, Exchange, Frame, Outcome};

use crate::harness::StubBuilder;

fn request(level: u32) -> Frame {
    StubBuilder::new()
        .null()
        .string("public")
        .u32(level)
        .frame(NET_SHARE_GET_INFO, Direction::Request)
}

fn response(level: u32) -> Frame {
    let stub = StubBuilder::new().u32(level);
    let stub = match level {
        1 => stub
            .pointer()
            .u32(0)
            .u32(0)
            .pointer()
            .string("public")
            .string("level one"),
        _ => stub,
    };
    stub.u32(0).frame(NET_SHARE_GET_INFO, Direction::Response)
}

#[test]
fn test_concurrent_exchanges_select_own_variant() {
    let dissector = Dissector::default();
    // level 502 has no share-info variant
    let levels: Vec<u32> = (0..16).map(|i| if i % 2 == 0 { 1 } else { 502 }).collect();

    thread::scope(|s| {
        let handles: Vec<_> = levels
            .iter()
            .map(|&level| {
                let dissector = &dissector;
                s.spawn(move || {
                    let mut exchange = Exchange::new();
                    for _ in 0..50 {
                        let req = dissector.dissect(&request(level), &mut exchange);
                        assert_eq!(req.outcome, Outcome::Decoded);
                        let resp = dissector.dissect(&response(level), &mut exchange);
                        assert_eq!(resp.outcome, Outcome::Decoded);
                        assert_eq!(exchange.level(), Some(level));
                        let comments = resp.tree.find_all("srvsvc.share_comment").len();
                        assert_eq!(comments, if level == 1 { 1 } else { 0 });
                    }
                    (level, exchange)
                })
            })
            .collect();

        for handle in handles {
            let (level, exchange) = handle.join().unwrap();
            assert_eq!(exchange.requested_level(), Some(level));
            assert_eq!(exchange.level(), Some(level));
        }
    });
}
