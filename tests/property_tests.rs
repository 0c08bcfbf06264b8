use proptest::prelude::*;

use rts433::consts::{ADDRESS_BASE, ADDRESS_MAX, MAX_REPEATS};
use rts433::encoding::encode_manchester;
use rts433::frame::{Command, Frame};
use rts433::obfuscation::{deobfuscate, obfuscate};
use rts433::registry::{DeviceRegistry, MemoryStore};
use rts433::transmission::{compose, consolidate};

fn command() -> impl Strategy<Value = Command> {
    prop::sample::select(Command::ALL.to_vec())
}

fn expected_len(repeats: usize) -> usize {
    let first = 2 + 4 + 2 + 112;
    let later = 14 + 2 + 112;
    first + (repeats - 1) * later + (repeats - 1)
}

proptest! {
    #[test]
    fn frame_nibbles_fold_to_zero(cmd in command(), code in any::<u16>(), addr in 0..=ADDRESS_MAX) {
        let frame = Frame::build(cmd, code, addr).unwrap();
        let folded = frame.bytes().iter().fold(0u8, |acc, b| acc ^ (b >> 4) ^ (b & 0x0f));
        prop_assert_eq!(folded, 0);
        prop_assert!(frame.is_valid());
        prop_assert_eq!(frame.key(), 0xA);
        prop_assert_eq!(frame.command(), Some(cmd));
        prop_assert_eq!(frame.rolling_code(), code);
        prop_assert_eq!(frame.address(), addr);
    }

    #[test]
    fn frame_build_is_deterministic(cmd in command(), code in any::<u16>(), addr in 0..=ADDRESS_MAX) {
        prop_assert_eq!(Frame::build(cmd, code, addr), Frame::build(cmd, code, addr));
    }

    #[test]
    fn wide_addresses_are_rejected(cmd in command(), addr in (ADDRESS_MAX + 1)..=u32::MAX) {
        prop_assert!(Frame::build(cmd, 1, addr).is_err());
    }

    #[test]
    fn obfuscation_round_trips(bytes in any::<[u8; 7]>()) {
        let out = obfuscate(&bytes);
        prop_assert_eq!(out[0], bytes[0]);
        prop_assert_eq!(deobfuscate(&out), bytes);
    }

    #[test]
    fn manchester_halves_have_opposite_polarity(bytes in any::<[u8; 7]>()) {
        let encoded = encode_manchester(&bytes);
        prop_assert_eq!(encoded.len(), 112);
        for (bit, pair) in encoded.chunks(2).enumerate() {
            prop_assert_eq!(pair[0], -pair[1]);
            prop_assert_eq!(pair[0].abs(), 604);
            let set = bytes[bit / 8] & (0x80 >> (bit % 8)) != 0;
            prop_assert_eq!(pair[0] < 0, set);
        }
    }

    #[test]
    fn transmission_shape(bytes in any::<[u8; 7]>(), repeats in 1..=MAX_REPEATS) {
        let manchester = encode_manchester(&bytes);
        let pulses = compose(&manchester, repeats).unwrap();
        prop_assert_eq!(pulses.len(), expected_len(repeats as usize));
        prop_assert_eq!(&pulses[..2], &[9415, -89565][..]);
        prop_assert_eq!(&pulses[pulses.len() - 112..], &manchester[..]);
        prop_assert!(pulses.iter().all(|d| *d != 0));
        prop_assert_eq!(pulses.iter().filter(|d| **d == -30415).count(), repeats as usize - 1);

        // every later frame: gap, seven hardware syncs, software sync, payload
        let first = 2 + 4 + 2 + 112;
        let mut repeat_block = vec![-30415];
        for _ in 0..7 {
            repeat_block.extend_from_slice(&[2416, -2416]);
        }
        repeat_block.extend_from_slice(&[4550, -604]);
        repeat_block.extend_from_slice(&manchester);
        prop_assert_eq!(&pulses[..8], &[9415, -89565, 2416, -2416, 2416, -2416, 4550, -604][..]);
        for (r, block) in pulses[first..].chunks(repeat_block.len()).enumerate() {
            prop_assert_eq!(block, &repeat_block[..], "frame {}", r + 1);
        }
    }

    #[test]
    fn consolidation_preserves_airtime(bytes in any::<[u8; 7]>(), repeats in 1..=MAX_REPEATS) {
        let pulses = compose(&encode_manchester(&bytes), repeats).unwrap();
        let merged = consolidate(&pulses);
        let on = |p: &[i32]| p.iter().filter(|d| **d > 0).map(|d| i64::from(*d)).sum::<i64>();
        let off = |p: &[i32]| p.iter().filter(|d| **d < 0).map(|d| i64::from(*d)).sum::<i64>();
        prop_assert_eq!(on(&pulses), on(&merged));
        prop_assert_eq!(off(&pulses), off(&merged));
        prop_assert!(merged.windows(2).all(|w| (w[0] > 0) != (w[1] > 0)));
    }

    #[test]
    fn registry_addresses_are_distinct(count in 1usize..=8) {
        let mut reg = DeviceRegistry::load(MemoryStore::default(), ADDRESS_BASE);
        for i in 0..count {
            let device = reg.register(&format!("Blind {i}")).unwrap();
            prop_assert_eq!(device.address, ADDRESS_BASE + i as u32 + 1);
            prop_assert_eq!(device.rolling_code, 1);
        }
        let mut addresses: Vec<u32> = reg.devices().iter().map(|d| d.address).collect();
        addresses.dedup();
        prop_assert_eq!(addresses.len(), count);
    }

    #[test]
    fn rolling_code_wraps(start in any::<u16>(), steps in 1u32..64) {
        let mut reg = DeviceRegistry::load(MemoryStore::default(), ADDRESS_BASE);
        let _ = reg.register("Shutter").unwrap();
        let mut document = reg.document().clone();
        document.devices[0].rolling_code = start;

        let mut reg = DeviceRegistry::load(MemoryStore::with_document(document), ADDRESS_BASE);
        let mut last = start;
        for _ in 0..steps {
            last = reg.advance(0).unwrap();
        }
        prop_assert_eq!(last, start.wrapping_add(steps as u16));
        let saved = reg.into_store().document.unwrap();
        prop_assert_eq!(saved.devices[0].rolling_code, last);
    }

    #[test]
    fn saved_document_reloads_unchanged(names in prop::collection::vec("[a-zA-Z ]{1,20}", 0..=8)) {
        let mut reg = DeviceRegistry::load(MemoryStore::default(), ADDRESS_BASE);
        for name in &names {
            let _ = reg.register(name).unwrap();
        }
        let document = reg.document().clone();
        let json = serde_json::to_string(&document).unwrap();
        let reloaded: rts433::registry::DeviceDocument = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(reloaded, document);
    }
}
