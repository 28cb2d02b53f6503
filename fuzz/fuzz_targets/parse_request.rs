#![no_main]

use actor_auth::request::{parse, Framing};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = parse(data, Framing::Document);
    let _ = parse(data, Framing::HeaderLine);
});
