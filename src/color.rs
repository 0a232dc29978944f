use rand::{rngs::StdRng, Rng, SeedableRng};

// FNV-1a, used only to seed the generator so that a key always maps to the same colour.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(PRIME)
    })
}

// A presentation colour "#rrggbb" for a group signature or edge length key.
pub fn color_for(key: &str) -> String {
    let mut rng = StdRng::seed_from_u64(fnv1a(key.as_bytes()));
    format!("#{:06x}", rng.gen_range(0..0x100_0000u32))
}
