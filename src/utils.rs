/// Greatest common divisor of two signed integers, always non-negative.
pub fn gcd_signed_i128(mut a: i128, mut b: i128) -> u128 {
    let mut c;
    while a != 0 {
        c = a;
        // only wraps when i128::MIN % -1 and that still yields 0
        a = b.wrapping_rem(a);
        b = c;
    }
    b.unsigned_abs()
}

/// Enumerate all multisets of size `k` drawn from `0..n`, as non-decreasing index lists.
pub fn multisets(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn rec(start: usize, n: usize, k: usize, cur: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if cur.len() == k {
            out.push(cur.clone());
            return;
        }
        for i in start..n {
            cur.push(i);
            rec(i, n, k, cur, out);
            cur.pop();
        }
    }

    let mut out = vec![];
    if n == 0 && k > 0 {
        return out;
    }
    rec(0, n, k, &mut Vec::with_capacity(k), &mut out);
    out
}
