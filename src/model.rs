use rocket::form::{self, DataField, FromForm, ValueField};
use rocket::serde::{Deserialize, Serialize};

/// Tag carried by every result envelope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Workload {
    Cpu,
    Json,
    Io,
}

/// A workload size read from the query string.
///
/// Parsing never fails: the value is coerced like a loose integer cast
/// (the leading numeric part wins, garbage reads as zero) and then clamped
/// to at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Count(u64);

impl Count {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<&str> for Count {
    fn from(s: &str) -> Self {
        Count(coerce_int(s).max(1).unsigned_abs())
    }
}

/// Length of the leading decimal digits of `b` starting at `from`.
fn digits_at(b: &[u8], from: usize) -> usize {
    b.get(from..)
        .map_or(0, |rest| rest.iter().take_while(|c| c.is_ascii_digit()).count())
}

fn coerce_int(s: &str) -> i64 {
    let s = s.trim_start();
    let b = s.as_bytes();

    let sign = usize::from(matches!(b.first(), Some(b'-' | b'+')));
    let int_digits = digits_at(b, sign);
    let mut end = sign + int_digits;
    let mut mantissa_digits = int_digits;
    let mut float = false;

    if b.get(end) == Some(&b'.') {
        let frac_digits = digits_at(b, end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
            mantissa_digits += frac_digits;
            float = true;
        }
    }
    if mantissa_digits > 0 && matches!(b.get(end), Some(b'e' | b'E')) {
        let exp_sign = usize::from(matches!(b.get(end + 1), Some(b'-' | b'+')));
        let exp_digits = digits_at(b, end + 1 + exp_sign);
        if exp_digits > 0 {
            end += 1 + exp_sign + exp_digits;
            float = true;
        }
    }

    if float {
        // `as` saturates out-of-range floats
        return s[..end].parse::<f64>().map_or(0, |f| f as i64);
    }

    let negative = b.first() == Some(&b'-');
    s[sign..end].bytes().fold(0i64, |acc, c| {
        let d = i64::from(c - b'0');
        if negative {
            acc.saturating_mul(10).saturating_sub(d)
        } else {
            acc.saturating_mul(10).saturating_add(d)
        }
    })
}

/// Storage medium for the I/O workload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IoMode {
    #[default]
    Memory,
    Disk,
}

impl From<&str> for IoMode {
    // anything but an exact "memory" falls back to disk
    fn from(s: &str) -> Self {
        if s == "memory" {
            IoMode::Memory
        } else {
            IoMode::Disk
        }
    }
}

/// Query decoding that keeps the last occurrence of a repeated key, so
/// `?n=5&n=7` reads as 7 instead of failing on the duplicate.
macro_rules! last_value_wins {
    ($ty:ty) => {
        #[rocket::async_trait]
        impl<'r> FromForm<'r> for $ty {
            type Context = Option<$ty>;

            fn init(_opts: form::Options) -> Self::Context {
                None
            }

            fn push_value(ctxt: &mut Self::Context, field: ValueField<'r>) {
                *ctxt = Some(<$ty>::from(field.value));
            }

            async fn push_data(_ctxt: &mut Self::Context, _field: DataField<'r, '_>) {}

            fn finalize(ctxt: Self::Context) -> form::Result<'r, Self> {
                ctxt.ok_or_else(|| form::Error::from(form::error::ErrorKind::Missing).into())
            }
        }
    };
}

last_value_wins!(Count);
last_value_wins!(IoMode);
