use once_cell::sync::Lazy;

// Galois field arithmetic
//------------------------------------------------------------------------------

// GF(256) with the QR reduction polynomial x^8 + x^4 + x^3 + x^2 + 1
const GF_POLY: usize = 0x11D;

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut val = 1usize;
    let mut i = 0;
    while i < 256 {
        table[i] = val as u8;
        val <<= 1;
        if val & 0x100 != 0 {
            val ^= GF_POLY;
        }
        i += 1;
    }
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

pub static EXP_TABLE: [u8; 256] = build_exp_table();

pub static LOG_TABLE: [u8; 256] = build_log_table();

fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_sum = LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize;
    EXP_TABLE[log_sum % 255]
}

// Generator polynomials in the log domain, indexed by ec codeword count. The
// leading coefficient is always 1 and is omitted.
static GENERATOR_POLYNOMIALS: Lazy<Vec<Vec<u8>>> = Lazy::new(|| {
    let mut polys = Vec::with_capacity(MAX_EC_SIZE + 1);
    // Coefficients in the antilog domain, highest degree first
    let mut gen = vec![1u8];
    polys.push(vec![]);
    for i in 0..MAX_EC_SIZE {
        let root = EXP_TABLE[i];
        let mut next = vec![0u8; gen.len() + 1];
        next[..gen.len()].copy_from_slice(&gen);
        for (j, &coeff) in gen.iter().enumerate() {
            next[j + 1] ^= gf_mul(coeff, root);
        }
        gen = next;
        polys.push(gen[1..].iter().map(|&c| LOG_TABLE[c as usize]).collect());
    }
    polys
});

// Error correction codeword generator
//------------------------------------------------------------------------------

// Performs polynomial long division with data polynomial(num)
// and generator polynomial(den) to compute remainder polynomial,
// the coefficients of which are the ecc
pub fn ecc(block: &[u8], ecc_count: usize) -> Vec<u8> {
    debug_assert!(ecc_count <= MAX_EC_SIZE, "Invalid ec codeword count: {ecc_count}");

    let len = block.len();
    let gen_poly = &GENERATOR_POLYNOMIALS[ecc_count];

    let mut res = block.to_vec();
    res.resize(len + ecc_count, 0);

    for i in 0..len {
        let lead_coeff = res[i] as usize;
        if lead_coeff == 0 {
            continue;
        }

        let log_lead_coeff = LOG_TABLE[lead_coeff] as usize;
        for (u, v) in res[i + 1..].iter_mut().zip(gen_poly.iter()) {
            let mut log_sum = *v as usize + log_lead_coeff;
            if log_sum >= 255 {
                log_sum -= 255;
            }
            *u ^= EXP_TABLE[log_sum];
        }
    }

    res.split_off(len)
}

#[cfg(test)]
mod ec_tests {
    use super::{ecc, gf_mul, EXP_TABLE, GENERATOR_POLYNOMIALS, LOG_TABLE};

    #[test]
    fn test_gf_tables() {
        assert_eq!(EXP_TABLE[0], 1);
        assert_eq!(EXP_TABLE[1], 2);
        assert_eq!(EXP_TABLE[8], 29);
        assert_eq!(EXP_TABLE[255], 1);
        assert_eq!(LOG_TABLE[1], 0);
        assert_eq!(LOG_TABLE[2], 1);
        assert_eq!(LOG_TABLE[29], 8);
        for i in 1..=254usize {
            assert_eq!(LOG_TABLE[EXP_TABLE[i] as usize] as usize, i);
        }
    }

    #[test]
    fn test_gf_mul() {
        assert_eq!(gf_mul(0, 7), 0);
        assert_eq!(gf_mul(1, 7), 7);
        assert_eq!(gf_mul(2, 128), 29);
        assert_eq!(gf_mul(3, 3), 5);
    }

    #[test]
    fn test_generator_polynomial_7() {
        let exp_poly: [u8; 7] = [87, 229, 146, 149, 238, 102, 21];
        assert_eq!(&*GENERATOR_POLYNOMIALS[7], &exp_poly);
    }

    #[test]
    fn test_generator_polynomial_10() {
        let exp_poly: [u8; 10] = [251, 67, 46, 61, 118, 70, 64, 94, 32, 45];
        assert_eq!(&*GENERATOR_POLYNOMIALS[10], &exp_poly);
    }

    #[test]
    fn test_poly_mod_1() {
        let res = ecc(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11", 10);
        assert_eq!(&*res, b"\xc4#'w\xeb\xd7\xe7\xe2]\x17");
    }

    #[test]
    fn test_poly_mod_2() {
        let res = ecc(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec", 13);
        assert_eq!(&*res, b"\xa8H\x16R\xd96\x9c\x00.\x0f\xb4z\x10");
    }

    #[test]
    fn test_poly_mod_3() {
        let res = ecc(b"CUF\x86W&U\xc2w2\x06\x12\x06g&", 18);
        assert_eq!(&*res, b"\xd5\xc7\x0b-s\xf7\xf1\xdf\xe5\xf8\x9au\x9aoV\xa1o'");
    }
}

// Global constants
//------------------------------------------------------------------------------

pub const MAX_EC_SIZE: usize = 30;
