/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use std::time::Duration;

pub trait ParseValue: Sized {
    fn parse_value(value: &str) -> Result<Self, String>;
}

pub trait AsKey: Clone {
    fn as_key(&self) -> String;
    fn as_prefix(&self) -> String;
}

impl AsKey for &str {
    fn as_key(&self) -> String {
        self.to_string()
    }

    fn as_prefix(&self) -> String {
        format!("{self}.")
    }
}

impl AsKey for String {
    fn as_key(&self) -> String {
        self.clone()
    }

    fn as_prefix(&self) -> String {
        format!("{self}.")
    }
}

impl AsKey for &String {
    fn as_key(&self) -> String {
        self.to_string()
    }

    fn as_prefix(&self) -> String {
        format!("{self}.")
    }
}

impl AsKey for (&str, &str) {
    fn as_key(&self) -> String {
        format!("{}.{}", self.0, self.1)
    }

    fn as_prefix(&self) -> String {
        format!("{}.{}.", self.0, self.1)
    }
}

impl AsKey for (&String, &str) {
    fn as_key(&self) -> String {
        format!("{}.{}", self.0, self.1)
    }

    fn as_prefix(&self) -> String {
        format!("{}.{}.", self.0, self.1)
    }
}

impl<T: ParseValue> ParseValue for Option<T> {
    fn parse_value(value: &str) -> Result<Self, String> {
        if !value.is_empty()
            && !value.eq_ignore_ascii_case("false")
            && !value.eq_ignore_ascii_case("disable")
            && !value.eq_ignore_ascii_case("disabled")
            && !value.eq_ignore_ascii_case("never")
            && !value.eq("0")
        {
            T::parse_value(value).map(Some)
        } else {
            Ok(None)
        }
    }
}

impl ParseValue for String {
    fn parse_value(value: &str) -> Result<Self, String> {
        Ok(value.to_string())
    }
}

impl ParseValue for bool {
    fn parse_value(value: &str) -> Result<Self, String> {
        value
            .parse()
            .map_err(|_| format!("Invalid boolean value {value:?}."))
    }
}

macro_rules! impl_parse_number {
    ($($ty:ty),*) => {
        $(
            impl ParseValue for $ty {
                fn parse_value(value: &str) -> Result<Self, String> {
                    value.parse().map_err(|_| {
                        format!("Invalid {} value {value:?}.", stringify!($ty))
                    })
                }
            }
        )*
    };
}

impl_parse_number!(u64, u32, u16, u8, usize, i64, i32, f64);

impl ParseValue for Duration {
    fn parse_value(value: &str) -> Result<Self, String> {
        let mut digits = String::new();
        let mut multiplier = String::new();

        for ch in value.trim().chars() {
            if ch.is_ascii_digit() {
                if multiplier.is_empty() {
                    digits.push(ch);
                } else {
                    return Err(format!("Invalid duration value {value:?}."));
                }
            } else if !ch.is_ascii_whitespace() {
                multiplier.push(ch.to_ascii_lowercase());
            }
        }

        let num = digits
            .parse::<u64>()
            .map_err(|_| format!("Invalid duration value {value:?}."))?;
        let millis = match multiplier.as_str() {
            "d" => num * 24 * 60 * 60 * 1000,
            "h" => num * 60 * 60 * 1000,
            "m" => num * 60 * 1000,
            "s" => num * 1000,
            "ms" | "" => num,
            _ => return Err(format!("Invalid duration value {value:?}.")),
        };

        Ok(Duration::from_millis(millis))
    }
}

impl ParseValue for trc::Level {
    fn parse_value(value: &str) -> Result<Self, String> {
        trc::Level::parse(value).ok_or_else(|| format!("Invalid log level {value:?}."))
    }
}
