//! Property tests for the write/read round trip.
//!
//! For any register whose backing is Real in the current mode, a
//! successful write followed by a read returns exactly the written
//! bytes, at every legal vector length.

use proptest::prelude::*;

use regctx_core::{BackingKind, RegisterValue};
use regctx_overlay::{FakeSmeTarget, RegisterContext};

/// Legal streaming vector lengths are multiples of 16 bytes.
fn svl_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![Just(16), Just(32), Just(64), Just(128), Just(256)]
}

proptest! {
    #[test]
    fn prop_real_registers_round_trip_in_streaming(
        svl in svl_strategy(),
        index in 0u8..32,
        byte in any::<u8>(),
    ) {
        let target = FakeSmeTarget::streaming(svl);
        let mut ctx = RegisterContext::new(1, target);

        for name in [format!("z{}", index), format!("p{}", index % 16), "ffr".to_string()] {
            let desc = ctx.catalog().describe(&name).unwrap().clone();
            let snap = ctx.snapshot().unwrap();
            prop_assert_eq!(desc.backing_in(snap.mode()), BackingKind::Real);

            let value = RegisterValue::splat(byte, snap.width_of(&desc));
            ctx.write_register(&name, &value).unwrap();
            prop_assert_eq!(ctx.read_register(&name).unwrap(), value);
        }
    }

    #[test]
    fn prop_v_registers_round_trip_outside_streaming(
        svl in svl_strategy(),
        index in 0u8..32,
        bytes in prop::collection::vec(any::<u8>(), 16),
    ) {
        let target = FakeSmeTarget::non_streaming(svl);
        let mut ctx = RegisterContext::new(1, target);

        let name = format!("v{}", index);
        let value = RegisterValue::new(bytes);
        ctx.write_register(&name, &value).unwrap();
        prop_assert_eq!(ctx.read_register(&name).unwrap(), value);
    }

    #[test]
    fn prop_alias_invariant_holds_after_arbitrary_z_writes(
        svl in svl_strategy(),
        index in 0u8..32,
        streaming in any::<bool>(),
        bytes in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let target = if streaming {
            FakeSmeTarget::streaming(svl)
        } else {
            FakeSmeTarget::non_streaming(svl)
        };
        let mut ctx = RegisterContext::new(1, target);

        let z_name = format!("z{}", index);
        let mut value = bytes;
        value.resize(svl, 0);
        ctx.write_register(&z_name, &RegisterValue::new(value)).unwrap();

        let z = ctx.read_register(&z_name).unwrap();
        let v = ctx.read_register(&format!("v{}", index)).unwrap();
        prop_assert_eq!(v.as_slice(), &z.as_slice()[..16]);
    }
}
