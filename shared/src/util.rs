//! Time and code generation helpers

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Characters a pickup code is drawn from (base-36, upper case)
const PICKUP_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of a pickup code
pub const PICKUP_CODE_LEN: usize = 6;

/// Generate a random pickup code: 6 uppercase base-36 characters.
///
/// Collisions are possible at this length. Callers that need uniqueness
/// must check the code against their own index and retry.
pub fn pickup_code() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..PICKUP_CODE_LEN)
        .map(|_| PICKUP_ALPHABET[rng.gen_range(0..PICKUP_ALPHABET.len())] as char)
        .collect()
}
