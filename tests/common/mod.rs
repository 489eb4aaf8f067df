// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shapes shared by the decoding integration tests.

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, TimeDelta};
use typedcfg::config_shape;
use typedcfg::domain::DecodeText;

/// A self-decoding integer where `"unlimited"` means `-1`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Decoded(pub i64);

impl DecodeText for Decoded {
    const TYPE_NAME: &'static str = "Decoded";
    type Err = std::num::ParseIntError;

    fn decode_text(text: &str) -> Result<Self, Self::Err> {
        if text == "unlimited" {
            return Ok(Decoded(-1));
        }
        text.parse().map(Decoded)
    }
}

config_shape! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Nested {
        pub integer: i64 => "integer",
        pub string: String => "string",
    }
}

config_shape! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct TestConfig {
        pub int: isize => "int",
        pub int_ptr: Option<isize> => "intPtr",
        pub int64: i64 => "int64",
        pub int64_ptr: Option<i64> => "int64Ptr",
        pub int32: i32 => "int32",
        pub int32_ptr: Option<i32> => "int32Ptr",
        pub int16: i16 => "int16",
        pub int16_ptr: Option<i16> => "int16Ptr",
        pub int8: i8 => "int8",
        pub int8_ptr: Option<i8> => "int8Ptr",
        pub uint: usize => "uint",
        pub uint_ptr: Option<usize> => "uintPtr",
        pub uint64: u64 => "uint64",
        pub uint64_ptr: Option<u64> => "uint64Ptr",
        pub uint32: u32 => "uint32",
        pub uint32_ptr: Option<u32> => "uint32Ptr",
        pub uint16: u16 => "uint16",
        pub uint16_ptr: Option<u16> => "uint16Ptr",
        pub byte: u8 => "byte",
        pub byte_ptr: Option<u8> => "bytePtr",
        pub float64: f64 => "float64",
        pub float64_ptr: Option<f64> => "float64Ptr",
        pub float32: f32 => "float32",
        pub float32_ptr: Option<f32> => "float32Ptr",
        pub bool: bool => "bool",
        pub bool_ptr: Option<bool> => "boolPtr",
        pub duration: TimeDelta => "duration",
        pub duration_ptr: Option<TimeDelta> => "durationPtr",
        pub time: DateTime<FixedOffset> => "time",
        pub time_ptr: Option<DateTime<FixedOffset>> => "timePtr",
        pub string: String => "string",
        pub string_ptr: Option<String> => "stringPtr",
        pub decoded: Decoded => "decoded",
        pub decoded_ptr: Option<Decoded> => "decodedPtr",
        pub nested: Nested => "nested",
        pub nested_ptr: Option<Nested> => "nestedPtr",
    }
}

pub const TIME_TEXT: &str = "2021-01-02T15:04:05-07:00";

pub fn time_val() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(TIME_TEXT).unwrap()
}

/// The target every successful fixture decodes to.
pub fn expected() -> TestConfig {
    TestConfig {
        int: -9999,
        int_ptr: Some(-9999),
        int64: -1234,
        int64_ptr: Some(-12345),
        int32: -5678,
        int32_ptr: Some(-5678),
        int16: -9012,
        int16_ptr: Some(-9012),
        int8: -128,
        int8_ptr: Some(-128),
        uint: 9999,
        uint_ptr: Some(9999),
        uint64: 1234,
        uint64_ptr: Some(1234),
        uint32: 5678,
        uint32_ptr: Some(5678),
        uint16: 9012,
        uint16_ptr: Some(9012),
        byte: 255,
        byte_ptr: Some(255),
        float64: 1234.5,
        float64_ptr: Some(1234.5),
        float32: 6789.5,
        float32_ptr: Some(6789.5),
        bool: true,
        bool_ptr: Some(true),
        duration: TimeDelta::seconds(5),
        duration_ptr: Some(TimeDelta::seconds(5)),
        time: time_val(),
        time_ptr: Some(time_val()),
        string: "1234".to_string(),
        string_ptr: Some("1234".to_string()),
        decoded: Decoded(-1),
        decoded_ptr: Some(Decoded(-1)),
        nested: Nested {
            integer: 1234,
            string: "5678".to_string(),
        },
        nested_ptr: Some(Nested {
            integer: 1234,
            string: "5678".to_string(),
        }),
    }
}
