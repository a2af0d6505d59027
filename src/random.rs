// Generalized over the rand Library so there's no hard dependencies.

pub fn rand_u8() -> u8 {
    rand::random()
}

pub fn rand_16_bytes() -> [u8; 16] {
    rand::random()
}
