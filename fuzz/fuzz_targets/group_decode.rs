#![no_main]

use libfuzzer_sys::fuzz_target;
use tally_core::TaskCounter;
use tally_group::{DecodeConfig, FrameworkCounterGroup};

fuzz_target!(|data: &[u8]| {
    let mut group = FrameworkCounterGroup::<TaskCounter>::new();
    group.increment(TaskCounter::MapInputRecords, 1);
    let before = group.snapshot();

    let strict = data.first().is_some_and(|b| b & 1 == 1);
    let config = if strict { DecodeConfig::strict() } else { DecodeConfig::default() };

    let mut input = data;
    match group.read_fields_with(&mut input, &config) {
        Ok(()) => {
            // non-minimal varints decode fine, so compare groups, not bytes
            let mut out = Vec::new();
            group.write_fields(&mut out).expect("encode into Vec");
            let mut again = FrameworkCounterGroup::<TaskCounter>::new();
            again.read_fields(&mut out.as_slice()).expect("decode own encoding");
            assert_eq!(again, group);
        }
        Err(_) => assert_eq!(group.snapshot(), before),
    }
});
