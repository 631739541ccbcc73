use cpamm_program::AmmInstruction;
use proptest::prelude::*;

proptest! {
    #[test]
    fn fuzz_instruction_decode(data in proptest::collection::vec(any::<u8>(), 0..128)) {
        // Must never panic; anything accepted must re-encode to the same bytes
        if let Ok(ix) = AmmInstruction::unpack(&data) {
            let mut buf = [0u8; 64];
            let n = ix.pack_into(&mut buf).unwrap();
            if let AmmInstruction::Initialize { authority: None, .. } = ix {
                // Authority bytes are ignored when the flag is off
                prop_assert_eq!(n, data.len());
            } else {
                prop_assert_eq!(&buf[..n], &data[..]);
            }
        }
    }
}
