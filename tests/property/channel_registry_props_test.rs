//! Property-based tests for the channel registry.
//!
//! Fresh channels start at volume 50 unmuted, in-range volumes are stored
//! verbatim, out-of-range volumes are rejected without touching state.

use proptest::prelude::*;
use tabmix::managers::channel_registry::{ChannelRegistry, ChannelRegistryTrait};
use tabmix::types::channel::ChannelId;
use tabmix::types::errors::MixerError;

fn arb_channel() -> impl Strategy<Value = ChannelId> {
    prop_oneof![
        1 => Just(ChannelId::Master),
        4 => (0u32..8).prop_map(ChannelId::Tab),
    ]
}

fn registry_with_all_tabs() -> ChannelRegistry {
    let mut reg = ChannelRegistry::new();
    for id in 0..8 {
        reg.create_channel(ChannelId::Tab(id)).unwrap();
    }
    reg
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn created_channels_start_at_defaults(id in any::<u32>()) {
        let mut reg = ChannelRegistry::new();
        reg.create_channel(ChannelId::Tab(id)).unwrap();
        let ch = reg.get_channel(ChannelId::Tab(id)).unwrap();
        prop_assert_eq!(ch.volume, 50);
        prop_assert!(!ch.muted);
    }

    #[test]
    fn valid_volume_is_stored(id in arb_channel(), v in 0i64..=100) {
        let mut reg = registry_with_all_tabs();
        reg.set_volume(id, v).unwrap();
        prop_assert_eq!(i64::from(reg.get_channel(id).unwrap().volume), v);
    }

    #[test]
    fn invalid_volume_is_rejected(
        id in arb_channel(),
        before in 0i64..=100,
        v in prop_oneof![i64::MIN..0i64, 101i64..=i64::MAX],
    ) {
        let mut reg = registry_with_all_tabs();
        reg.set_volume(id, before).unwrap();
        prop_assert_eq!(reg.set_volume(id, v), Err(MixerError::InvalidVolume(v)));
        prop_assert_eq!(i64::from(reg.get_channel(id).unwrap().volume), before);
    }

    #[test]
    fn mute_sequences_track_last_value(
        ops in prop::collection::vec((any::<bool>(), 0i64..=100), 1..30)
    ) {
        let mut reg = registry_with_all_tabs();
        let id = ChannelId::Tab(3);
        let mut captured = 50u8;
        let mut muted = false;
        let mut volume = 50u8;
        for (mute, v) in ops {
            reg.set_volume(id, v).unwrap();
            volume = v as u8;
            if mute && !muted {
                captured = volume;
            }
            muted = mute;
            reg.set_muted(id, mute).unwrap();
        }
        let ch = reg.get_channel(id).unwrap();
        prop_assert_eq!(ch.muted, muted);
        prop_assert_eq!(ch.volume, volume);
        prop_assert_eq!(ch.pre_mute_volume, captured);
    }
}
