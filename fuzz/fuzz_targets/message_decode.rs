//! Fuzz target for channel message decoding.
//!
//! Arbitrary bytes must decode or fail cleanly, and anything that decodes
//! must survive a re-encode.

#![no_main]

use libfuzzer_sys::fuzz_target;
use wodclock_proto::ChannelMessage;

fuzz_target!(|data: &[u8]| {
    if let Ok(message) = ChannelMessage::decode(data) {
        let encoded = message.encode().expect("decoded message must encode");
        let again = ChannelMessage::decode(&encoded).expect("encoded message must decode");
        assert_eq!(message, again);
    }
});
