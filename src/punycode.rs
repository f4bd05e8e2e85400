//! Punycode encoding of internationalised labels (RFC 3492).

/// Prefix marking an ASCII-compatible encoded label.
pub const ACE_PREFIX: &str = "xn--";

const BASE: u64 = 36;
const T_MIN: u64 = 1;
const T_MAX: u64 = 26;
const INITIAL_BIAS: u64 = 72;
const INITIAL_N: u64 = 128;

/// Append the Punycode form of `label` to `out`, without the ACE prefix.
pub fn encode(label: &str, out: &mut String) {
    let input: Vec<u64> = label.chars().map(|c| c as u64).collect();

    // Basic code points are copied verbatim and terminated by a delimiter.
    let basic = input.iter().filter(|&&c| c < 0x80).count() as u64;
    out.extend(label.chars().filter(char::is_ascii));
    if basic > 0 {
        out.push('-');
    }

    let mut n = INITIAL_N;
    let mut delta = 0u64;
    let mut bias = INITIAL_BIAS;
    let mut handled = basic;

    while (handled as usize) < input.len() {
        let Some(m) = input.iter().copied().filter(|&c| c >= n).min() else {
            break;
        };
        delta += (m - n) * (handled + 1);
        n = m;

        for &c in &input {
            if c < n {
                delta += 1;
            }
            if c != n {
                continue;
            }

            // Emit delta as a generalized variable-length integer.
            let mut q = delta;
            let mut k = BASE;
            loop {
                let t = threshold(k, bias);
                if q < t {
                    break;
                }
                out.push(digit(t + (q - t) % (BASE - t)));
                q = (q - t) / (BASE - t);
                k += BASE;
            }
            out.push(digit(q));

            bias = adapt(delta, handled + 1, handled == basic);
            delta = 0;
            handled += 1;
        }

        delta += 1;
        n += 1;
    }
}

fn threshold(k: u64, bias: u64) -> u64 {
    if k <= bias {
        T_MIN
    } else if k >= bias + T_MAX {
        T_MAX
    } else {
        k - bias
    }
}

fn digit(d: u64) -> char {
    if d < 26 {
        (b'a' + d as u8) as char
    } else {
        (b'0' + (d - 26) as u8) as char
    }
}

/// Adjust the transcoding bias.
fn adapt(mut delta: u64, length: u64, first: bool) -> u64 {
    delta /= if first { 700 } else { 2 };
    delta += delta / length;
    let mut k = 0;
    while delta > 455 {
        delta /= 35;
        k += BASE;
    }
    k + (36 * delta) / (38 + delta)
}
