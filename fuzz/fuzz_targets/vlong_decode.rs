#![no_main]

use libfuzzer_sys::fuzz_target;
use tally_wire::{vlong_size, DataInput, DataOutput};

fuzz_target!(|data: &[u8]| {
    let mut input = data;
    if let Ok(value) = input.read_vlong() {
        let consumed = data.len() - input.len();
        assert!(consumed >= vlong_size(value));

        let mut out = Vec::new();
        out.write_vlong(value).expect("encode into Vec");
        let mut again: &[u8] = &out;
        assert_eq!(again.read_vlong().ok(), Some(value));
    }
});
