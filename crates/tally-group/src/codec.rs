//! Compact encoding of a framework counter group
//!
//! ```text
//! FrameworkGroup ::= count:vint (ordinal:vint value:vlong)*
//! ```
//!
//! Only populated slots are written, in ascending ordinal order, so the
//! encoded size follows the number of touched counters rather than the
//! enumeration's cardinality.

use std::sync::{Arc, OnceLock};

use tally_core::{CounterEnum, TallyError, TallyResult};
use tally_wire::{DataInput, DataOutput};
use tracing::{debug, warn};

use crate::group::empty_slots;
use crate::{FrameworkCounter, FrameworkCounterGroup};

/// Decoder configuration
#[derive(Clone, Debug, Default)]
pub struct DecodeConfig {
    /// Reject a count above the slot capacity and repeated ordinals.
    /// When unset, a repeated ordinal replaces the earlier entry.
    pub strict: bool,
}

impl DecodeConfig {
    /// Configuration for untrusted input
    pub fn strict() -> Self {
        DecodeConfig { strict: true }
    }
}

impl<E: CounterEnum> FrameworkCounterGroup<E> {
    /// Encode the populated slots
    pub fn write_fields<O: DataOutput + ?Sized>(&self, out: &mut O) -> TallyResult<()> {
        let entries = self.snapshot();

        out.write_vint(wire_int(entries.len())?)?;
        for (key, value) in &entries {
            out.write_vint(wire_int(key.ordinal())?)?;
            out.write_vlong(*value)?;
        }

        debug!(group = E::GROUP_NAME, counters = entries.len(), "encoded counter group");
        Ok(())
    }

    /// Replace the group's counters with the encoded ones
    pub fn read_fields<I: DataInput + ?Sized>(&mut self, input: &mut I) -> TallyResult<()> {
        self.read_fields_with(input, &DecodeConfig::default())
    }

    /// Replace the group's counters with the encoded ones.
    ///
    /// Decoding fills a fresh slot array that is installed only once the
    /// whole group has been read; on error the group is left as it was.
    pub fn read_fields_with<I: DataInput + ?Sized>(
        &mut self,
        input: &mut I,
        config: &DecodeConfig,
    ) -> TallyResult<()> {
        let cardinality = self.slots.len();

        let count = input.read_vint()?;
        let count = usize::try_from(count)
            .map_err(|_| TallyError::InvalidWireFormat(format!("negative counter count {}", count)))?;

        if config.strict && count > cardinality {
            warn!(group = E::GROUP_NAME, count, cardinality, "counter count exceeds slots");
            return Err(TallyError::InvalidWireFormat(format!(
                "{} counters for {} slots",
                count, cardinality
            )));
        }

        let mut slots = empty_slots::<E>();
        for _ in 0..count {
            let raw = input.read_vint()?;
            let ordinal = usize::try_from(raw)
                .map_err(|_| TallyError::InvalidWireFormat(format!("negative counter ordinal {}", raw)))?;
            let key = E::from_ordinal(ordinal).ok_or(TallyError::OrdinalOutOfRange {
                group: E::GROUP_NAME,
                ordinal,
                cardinality,
            })?;
            let value = input.read_vlong()?;

            if config.strict && slots[ordinal].get().is_some() {
                warn!(group = E::GROUP_NAME, ordinal, "repeated counter ordinal");
                return Err(TallyError::InvalidWireFormat(format!(
                    "counter ordinal {} repeated",
                    ordinal
                )));
            }

            slots[ordinal] = OnceLock::from(FrameworkCounter::with_value(
                key,
                value,
                Arc::clone(&self.names),
            ));
        }

        self.slots = slots;
        debug!(group = E::GROUP_NAME, counters = count, "decoded counter group");
        Ok(())
    }
}

fn wire_int(n: usize) -> TallyResult<i32> {
    i32::try_from(n).map_err(|_| TallyError::InvalidArgument(format!("{} exceeds vint range", n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;

    use bytes::BytesMut;
    use tally_core::{counter_enum, TaskCounter};
    use tally_wire::{IoInput, IoOutput};

    use crate::Counter;

    counter_enum! {
        enum Letters in "test.Letters" {
            A = "A",
            B = "B",
            C = "C",
        }
    }

    counter_enum! {
        enum Nothing in "test.Nothing" {}
    }

    fn encode<E: CounterEnum>(group: &FrameworkCounterGroup<E>) -> Vec<u8> {
        let mut out = Vec::new();
        group.write_fields(&mut out).unwrap();
        out
    }

    #[test]
    fn test_example_layout() {
        let group = FrameworkCounterGroup::<Letters>::new();
        group.increment(Letters::A, 10);
        group.increment(Letters::C, 30);

        let bytes = encode(&group);
        assert_eq!(bytes, vec![2, 0, 10, 2, 30]);

        let mut decoded = FrameworkCounterGroup::<Letters>::new();
        decoded.read_fields(&mut bytes.as_slice()).unwrap();

        assert_eq!(decoded.snapshot(), vec![(Letters::A, 10), (Letters::C, 30)]);
        assert_eq!(decoded.value(Letters::B), None);
    }

    #[test]
    fn test_empty_group_is_one_byte() {
        let group = FrameworkCounterGroup::<TaskCounter>::new();
        assert_eq!(encode(&group), vec![0]);
    }

    #[test]
    fn test_zero_value_enumeration() {
        let group = FrameworkCounterGroup::<Nothing>::new();
        assert_eq!(group.size(), 0);
        assert_eq!(encode(&group), vec![0]);
        assert!(group.find_counter("A").is_err());

        let mut decoded = FrameworkCounterGroup::<Nothing>::new();
        decoded.read_fields(&mut [0u8].as_slice()).unwrap();
        assert!(decoded.is_empty());
        assert!(matches!(
            decoded.read_fields(&mut [1u8, 0, 5].as_slice()),
            Err(TallyError::OrdinalOutOfRange { .. })
        ));
    }

    #[test]
    fn test_encoding_is_sparse() {
        let group = FrameworkCounterGroup::<TaskCounter>::new();
        group.increment(TaskCounter::CommittedHeapBytes, 1 << 30);

        // count, ordinal 22, 4-byte value with prefix
        assert_eq!(encode(&group).len(), 1 + 1 + 5);
    }

    #[test]
    fn test_roundtrip_negative_and_extreme_values() {
        let group = FrameworkCounterGroup::<TaskCounter>::new();
        group.increment(TaskCounter::MapInputRecords, -1);
        group.increment(TaskCounter::SpilledRecords, i64::MIN);
        group.increment(TaskCounter::GcTimeMillis, i64::MAX);
        group.increment(TaskCounter::CpuMilliseconds, -113);
        group.counter(TaskCounter::ShuffledMaps);

        let bytes = encode(&group);
        let mut decoded = FrameworkCounterGroup::<TaskCounter>::new();
        decoded.read_fields(&mut bytes.as_slice()).unwrap();

        assert_eq!(decoded, group);
        assert_eq!(decoded.snapshot(), group.snapshot());
        assert_eq!(decoded.value(TaskCounter::ShuffledMaps), Some(0));
    }

    #[test]
    fn test_decode_replaces_existing_counters() {
        let source = FrameworkCounterGroup::<Letters>::new();
        source.increment(Letters::B, 2);
        let bytes = encode(&source);

        let mut target = FrameworkCounterGroup::<Letters>::new();
        target.increment(Letters::A, 1);
        let old = target.counter(Letters::B) as *const _;
        target.read_fields(&mut bytes.as_slice()).unwrap();

        assert_eq!(target.snapshot(), vec![(Letters::B, 2)]);
        assert!(!std::ptr::eq(old, target.counter(Letters::B)));
    }

    #[test]
    fn test_out_of_range_ordinal_leaves_group_untouched() {
        let mut group = FrameworkCounterGroup::<Letters>::new();
        group.increment(Letters::A, 7);

        // count 2: (1, 5) then ordinal 3 which Letters does not have
        let bytes = [2u8, 1, 5, 3, 9];
        let err = group.read_fields(&mut &bytes[..]).unwrap_err();

        assert!(matches!(
            err,
            TallyError::OrdinalOutOfRange {
                ordinal: 3,
                cardinality: 3,
                ..
            }
        ));
        assert_eq!(group.snapshot(), vec![(Letters::A, 7)]);
    }

    #[test]
    fn test_negative_count_and_ordinal() {
        let mut group = FrameworkCounterGroup::<Letters>::new();

        let negative_count = [0xFFu8];
        assert!(matches!(
            group.read_fields(&mut &negative_count[..]),
            Err(TallyError::InvalidWireFormat(_))
        ));

        let negative_ordinal = [1u8, 0xFF, 4];
        assert!(matches!(
            group.read_fields(&mut &negative_ordinal[..]),
            Err(TallyError::InvalidWireFormat(_))
        ));
    }

    #[test]
    fn test_truncated_input() {
        let mut group = FrameworkCounterGroup::<Letters>::new();
        group.increment(Letters::C, 3);

        let bytes = [2u8, 0, 10, 2];
        assert!(matches!(
            group.read_fields(&mut &bytes[..]),
            Err(TallyError::BufferTooShort { .. })
        ));
        assert_eq!(group.snapshot(), vec![(Letters::C, 3)]);
    }

    #[test]
    fn test_repeated_ordinal() {
        let bytes = [2u8, 1, 5, 1, 6];

        let mut lenient = FrameworkCounterGroup::<Letters>::new();
        lenient.read_fields(&mut &bytes[..]).unwrap();
        assert_eq!(lenient.snapshot(), vec![(Letters::B, 6)]);

        let mut strict = FrameworkCounterGroup::<Letters>::new();
        assert!(matches!(
            strict.read_fields_with(&mut &bytes[..], &DecodeConfig::strict()),
            Err(TallyError::InvalidWireFormat(_))
        ));
        assert!(strict.is_empty());
    }

    #[test]
    fn test_strict_rejects_oversized_count() {
        let bytes = [4u8, 0, 1, 1, 1, 2, 1, 0, 1];
        let mut group = FrameworkCounterGroup::<Letters>::new();
        assert!(matches!(
            group.read_fields_with(&mut &bytes[..], &DecodeConfig::strict()),
            Err(TallyError::InvalidWireFormat(_))
        ));
    }

    #[test]
    fn test_io_streams() {
        let group = FrameworkCounterGroup::<Letters>::new();
        group.increment(Letters::B, 1_000_000);

        let mut out = IoOutput::new(Vec::new());
        group.write_fields(&mut out).unwrap();

        let mut decoded = FrameworkCounterGroup::<Letters>::new();
        let mut input = IoInput::new(io::Cursor::new(out.into_inner()));
        decoded.read_fields(&mut input).unwrap();
        assert_eq!(decoded.value(Letters::B), Some(1_000_000));

        let mut empty = IoInput::new(io::empty());
        assert!(matches!(
            decoded.read_fields(&mut empty),
            Err(TallyError::Io(_))
        ));
        assert_eq!(decoded.value(Letters::B), Some(1_000_000));
    }

    #[test]
    fn test_bytes_sink_and_dyn_streams() {
        let group = FrameworkCounterGroup::<Letters>::new();
        group.increment(Letters::A, -5);

        let mut out = BytesMut::new();
        {
            let sink: &mut dyn DataOutput = &mut out;
            group.write_fields(sink).unwrap();
        }

        let mut frozen = out.freeze();
        let source: &mut dyn DataInput = &mut frozen;
        let mut decoded = FrameworkCounterGroup::<Letters>::new();
        decoded.read_fields(source).unwrap();
        assert_eq!(decoded.counter(Letters::A).value(), -5);
    }
}
