//! Typed variant value model.
//!
//! # Responsibility
//! - Hold exactly one scalar, string, binary or homogeneous vector payload.
//! - Provide named construction, ordered comparison, cursor-based extraction
//!   and best-effort coercion for every supported payload type.
//!
//! # Invariants
//! - The payload always matches the reported kind; vectors are homogeneous
//!   and their element count is fixed at construction.
//! - Extraction never advances the cursor past the element count.
//! - Comparison and equality ignore the extraction cursor.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type VariantResult<T> = Result<T, VariantError>;

/// Element type of a variant payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Bool,
    Int16,
    Int32,
    Int64,
    UInt16,
    UInt32,
    UInt64,
    Double,
    /// 128-bit identifier.
    Identifier,
    /// [`FileTime`] timestamp.
    Timestamp,
    String,
    /// Opaque byte buffer.
    Buffer,
}

impl ScalarKind {
    /// Stable lower-case name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Double => "double",
            Self::Identifier => "identifier",
            Self::Timestamp => "timestamp",
            Self::String => "string",
            Self::Buffer => "buffer",
        }
    }
}

/// Discriminant of a [`VariantValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    Scalar(ScalarKind),
    Vector(ScalarKind),
}

impl Display for VariantKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{}", kind.as_str()),
            Self::Vector(kind) => write!(f, "vector<{}>", kind.as_str()),
        }
    }
}

/// Kinds that can be tested with [`VariantValue::is`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantQuery {
    String,
    Vector,
}

/// Timestamp in 100-nanosecond ticks since 1601-01-01 UTC.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct FileTime(u64);

impl FileTime {
    /// Tick value of 1970-01-01T00:00:00Z.
    pub const UNIX_EPOCH_TICKS: u64 = 116_444_736_000_000_000;
    const TICKS_PER_MILLI: i128 = 10_000;

    pub const fn from_ticks(ticks: u64) -> Self {
        Self(ticks)
    }

    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Converts Unix epoch milliseconds.
    ///
    /// Returns `None` when the instant is not representable (before 1601).
    pub fn from_unix_millis(millis: i64) -> Option<Self> {
        let ticks =
            i128::from(Self::UNIX_EPOCH_TICKS) + i128::from(millis) * Self::TICKS_PER_MILLI;
        u64::try_from(ticks).ok().map(Self)
    }

    /// Returns Unix epoch milliseconds, truncating sub-millisecond ticks.
    pub fn to_unix_millis(self) -> i64 {
        let delta = i128::from(self.0) - i128::from(Self::UNIX_EPOCH_TICKS);
        // u64 ticks / 10_000 always fits in i64.
        (delta / Self::TICKS_PER_MILLI) as i64
    }
}

/// Errors from variant construction, extraction and conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantError {
    /// The payload cannot be represented at the marshalling boundary.
    Marshal { kind: ScalarKind, reason: String },
    /// Operation requires a different kind than the one stored.
    TypeMismatch {
        expected: VariantKind,
        actual: VariantKind,
    },
    /// Cursor or element index is past the element count.
    IndexOutOfRange { index: usize, count: usize },
    /// No coercion path from the stored kind to the requested type.
    Conversion { from: VariantKind, to: VariantKind },
    /// Declared element count does not match the supplied values.
    InvalidArgument { declared: usize, supplied: usize },
}

impl Display for VariantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Marshal { kind, reason } => {
                write!(f, "cannot marshal {} value: {reason}", kind.as_str())
            }
            Self::TypeMismatch { expected, actual } => {
                write!(f, "variant type mismatch: expected {expected}, found {actual}")
            }
            Self::IndexOutOfRange { index, count } => {
                write!(f, "variant index {index} out of range for {count} element(s)")
            }
            Self::Conversion { from, to } => write!(f, "cannot convert {from} to {to}"),
            Self::InvalidArgument { declared, supplied } => write!(
                f,
                "declared element count {declared} does not match {supplied} supplied value(s)"
            ),
        }
    }
}

impl Error for VariantError {}

#[derive(Debug, Clone)]
enum Scalar {
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Double(f64),
    Identifier(Uuid),
    Timestamp(FileTime),
    String(String),
    Buffer(Vec<u8>),
}

impl Scalar {
    fn kind(&self) -> ScalarKind {
        match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::Int16(_) => ScalarKind::Int16,
            Self::Int32(_) => ScalarKind::Int32,
            Self::Int64(_) => ScalarKind::Int64,
            Self::UInt16(_) => ScalarKind::UInt16,
            Self::UInt32(_) => ScalarKind::UInt32,
            Self::UInt64(_) => ScalarKind::UInt64,
            Self::Double(_) => ScalarKind::Double,
            Self::Identifier(_) => ScalarKind::Identifier,
            Self::Timestamp(_) => ScalarKind::Timestamp,
            Self::String(_) => ScalarKind::String,
            Self::Buffer(_) => ScalarKind::Buffer,
        }
    }

    /// Numeric view used for cross-kind comparison. Bool is not numeric here.
    fn numeric(&self) -> Option<Numeric> {
        match self {
            Self::Int16(value) => Some(Numeric::Int(i128::from(*value))),
            Self::Int32(value) => Some(Numeric::Int(i128::from(*value))),
            Self::Int64(value) => Some(Numeric::Int(i128::from(*value))),
            Self::UInt16(value) => Some(Numeric::Int(i128::from(*value))),
            Self::UInt32(value) => Some(Numeric::Int(i128::from(*value))),
            Self::UInt64(value) => Some(Numeric::Int(i128::from(*value))),
            Self::Double(value) => Some(Numeric::Float(*value)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i128),
    Float(f64),
}

fn compare_numeric(left: Numeric, right: Numeric) -> Ordering {
    match (left, right) {
        (Numeric::Int(a), Numeric::Int(b)) => a.cmp(&b),
        (Numeric::Float(a), Numeric::Float(b)) => a.total_cmp(&b),
        (Numeric::Int(a), Numeric::Float(b)) => compare_int_float(a, b),
        (Numeric::Float(a), Numeric::Int(b)) => compare_int_float(b, a).reverse(),
    }
}

/// Exact integer/double ordering. NaN sorts by sign, as in `f64::total_cmp`.
fn compare_int_float(int: i128, float: f64) -> Ordering {
    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    // 2^127; also catches the infinities.
    let limit = i128::MAX as f64;
    let floor = float.floor();
    if floor >= limit {
        return Ordering::Less;
    }
    if floor < -limit {
        return Ordering::Greater;
    }
    // `floor` is integral and in range, so the cast is exact.
    match int.cmp(&(floor as i128)) {
        Ordering::Equal if float > floor => Ordering::Less,
        ordering => ordering,
    }
}

fn compare_scalars(left: &Scalar, right: &Scalar) -> Option<Ordering> {
    match (left, right) {
        (Scalar::Bool(a), Scalar::Bool(b)) => Some(a.cmp(b)),
        (Scalar::Identifier(a), Scalar::Identifier(b)) => Some(a.cmp(b)),
        (Scalar::Timestamp(a), Scalar::Timestamp(b)) => Some(a.cmp(b)),
        (Scalar::String(a), Scalar::String(b)) => Some(a.cmp(b)),
        (Scalar::Buffer(a), Scalar::Buffer(b)) => Some(a.cmp(b)),
        _ => match (left.numeric(), right.numeric()) {
            (Some(a), Some(b)) => Some(compare_numeric(a, b)),
            _ => None,
        },
    }
}

/// Maps a Rust element type onto its scalar payload slot.
trait Element: Sized + Clone {
    const KIND: ScalarKind;
    fn wrap(self) -> Scalar;
    fn unwrap(scalar: &Scalar) -> Option<Self>;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident) => {
        impl Element for $ty {
            const KIND: ScalarKind = ScalarKind::$variant;

            fn wrap(self) -> Scalar {
                Scalar::$variant(self)
            }

            fn unwrap(scalar: &Scalar) -> Option<Self> {
                match scalar {
                    Scalar::$variant(value) => Some(value.clone()),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(bool, Bool);
impl_element!(i16, Int16);
impl_element!(i32, Int32);
impl_element!(i64, Int64);
impl_element!(u16, UInt16);
impl_element!(u32, UInt32);
impl_element!(u64, UInt64);
impl_element!(f64, Double);
impl_element!(Uuid, Identifier);
impl_element!(FileTime, Timestamp);
impl_element!(String, String);
impl_element!(Vec<u8>, Buffer);

#[derive(Debug, Clone)]
enum Payload {
    Scalar(Scalar),
    Vector {
        element_kind: ScalarKind,
        elements: Vec<Scalar>,
    },
}

/// Tagged value holding one scalar or one homogeneous vector.
///
/// Values are built through one named constructor per payload type, read back
/// either element-by-element through an internal cursor (`next_*`) or as a
/// whole through coercing conversions (`to_*`).
#[derive(Debug, Clone)]
pub struct VariantValue {
    payload: Payload,
    cursor: usize,
}

// Generic plumbing shared by the named entry points.
impl VariantValue {
    fn scalar<T: Element>(value: T) -> Self {
        Self {
            payload: Payload::Scalar(value.wrap()),
            cursor: 0,
        }
    }

    fn vector<T: Element>(values: &[T], count: usize) -> VariantResult<Self> {
        if values.len() != count {
            return Err(VariantError::InvalidArgument {
                declared: count,
                supplied: values.len(),
            });
        }
        Ok(Self {
            payload: Payload::Vector {
                element_kind: T::KIND,
                elements: values.iter().cloned().map(Element::wrap).collect(),
            },
            cursor: 0,
        })
    }

    fn element_at(&self, index: usize) -> VariantResult<&Scalar> {
        let found = match &self.payload {
            Payload::Scalar(scalar) => (index == 0).then_some(scalar),
            Payload::Vector { elements, .. } => elements.get(index),
        };
        found.ok_or(VariantError::IndexOutOfRange {
            index,
            count: self.element_count(),
        })
    }

    fn extract<T: Element>(&mut self) -> VariantResult<T> {
        if self.element_kind() != T::KIND {
            return Err(self.mismatch(T::KIND));
        }
        let value = T::unwrap(self.element_at(self.cursor)?).ok_or(self.mismatch(T::KIND))?;
        self.cursor += 1;
        Ok(value)
    }

    fn to_vector<T: Element>(&self) -> VariantResult<Vec<T>> {
        let err = || self.conversion_error(VariantKind::Vector(T::KIND));
        if self.element_kind() != T::KIND {
            return Err(err());
        }
        match &self.payload {
            Payload::Scalar(scalar) => T::unwrap(scalar).map(|value| vec![value]).ok_or_else(err),
            Payload::Vector { elements, .. } => elements
                .iter()
                .map(|scalar| T::unwrap(scalar).ok_or_else(err))
                .collect(),
        }
    }

    fn mismatch(&self, expected: ScalarKind) -> VariantError {
        let expected = match self.payload {
            Payload::Scalar(_) => VariantKind::Scalar(expected),
            Payload::Vector { .. } => VariantKind::Vector(expected),
        };
        VariantError::TypeMismatch {
            expected,
            actual: self.kind(),
        }
    }

    fn conversion_error(&self, to: VariantKind) -> VariantError {
        VariantError::Conversion {
            from: self.kind(),
            to,
        }
    }

    fn as_scalar(&self) -> Option<&Scalar> {
        match &self.payload {
            Payload::Scalar(scalar) => Some(scalar),
            Payload::Vector { .. } => None,
        }
    }
}

fn check_text(text: &str) -> VariantResult<()> {
    if text.contains('\0') {
        return Err(VariantError::Marshal {
            kind: ScalarKind::String,
            reason: "text contains an interior NUL".to_string(),
        });
    }
    Ok(())
}

fn parse_identifier(text: &str) -> Option<Uuid> {
    Uuid::parse_str(text.trim()).ok()
}

// Construction.
impl VariantValue {
    pub fn from_bool(value: bool) -> Self {
        Self::scalar(value)
    }

    pub fn from_int16(value: i16) -> Self {
        Self::scalar(value)
    }

    pub fn from_int32(value: i32) -> Self {
        Self::scalar(value)
    }

    pub fn from_int64(value: i64) -> Self {
        Self::scalar(value)
    }

    pub fn from_uint16(value: u16) -> Self {
        Self::scalar(value)
    }

    pub fn from_uint32(value: u32) -> Self {
        Self::scalar(value)
    }

    pub fn from_uint64(value: u64) -> Self {
        Self::scalar(value)
    }

    pub fn from_double(value: f64) -> Self {
        Self::scalar(value)
    }

    pub fn from_identifier(value: Uuid) -> Self {
        Self::scalar(value)
    }

    /// Parses hyphenated, simple, braced or URN identifier text.
    ///
    /// # Errors
    /// - `Marshal` when the text is not a valid identifier.
    pub fn from_identifier_str(text: &str) -> VariantResult<Self> {
        parse_identifier(text)
            .map(Self::from_identifier)
            .ok_or_else(|| VariantError::Marshal {
                kind: ScalarKind::Identifier,
                reason: format!("malformed identifier `{text}`"),
            })
    }

    /// Stores the identifier as braced upper-case text.
    pub fn from_identifier_as_string(value: Uuid) -> Self {
        Self::scalar(format!("{:X}", value.braced()))
    }

    /// Stores the identifier as 16 bytes in little-endian field layout.
    pub fn from_identifier_as_buffer(value: Uuid) -> Self {
        Self::scalar(value.to_bytes_le().to_vec())
    }

    pub fn from_timestamp(value: FileTime) -> Self {
        Self::scalar(value)
    }

    /// # Errors
    /// - `Marshal` when the text contains an interior NUL.
    pub fn from_string(text: &str) -> VariantResult<Self> {
        check_text(text)?;
        Ok(Self::scalar(text.to_string()))
    }

    /// Decodes UTF-16 code units.
    ///
    /// # Errors
    /// - `Marshal` on unpaired surrogates or interior NUL.
    pub fn from_wide(units: &[u16]) -> VariantResult<Self> {
        let text = String::from_utf16(units).map_err(|err| VariantError::Marshal {
            kind: ScalarKind::String,
            reason: err.to_string(),
        })?;
        Self::from_string(&text)
    }

    /// Splits `;`-separated text into a string vector, dropping blank parts.
    pub fn from_string_as_vector(text: &str) -> VariantResult<Self> {
        check_text(text)?;
        let parts = text
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        Self::vector(&parts, parts.len())
    }

    pub fn from_buffer(bytes: &[u8]) -> Self {
        Self::scalar(bytes.to_vec())
    }

    /// Copies element `index` of `other` into a new scalar value.
    ///
    /// # Errors
    /// - `IndexOutOfRange` when `index >= other.element_count()`.
    pub fn from_element(other: &VariantValue, index: usize) -> VariantResult<Self> {
        let scalar = other.element_at(index)?.clone();
        Ok(Self {
            payload: Payload::Scalar(scalar),
            cursor: 0,
        })
    }

    /// Wraps a scalar as a single-element vector.
    ///
    /// # Errors
    /// - `TypeMismatch` when `single` is already a vector.
    pub fn vector_from_scalar(single: &VariantValue) -> VariantResult<Self> {
        match &single.payload {
            Payload::Scalar(scalar) => Ok(Self {
                payload: Payload::Vector {
                    element_kind: scalar.kind(),
                    elements: vec![scalar.clone()],
                },
                cursor: 0,
            }),
            Payload::Vector { element_kind, .. } => Err(VariantError::TypeMismatch {
                expected: VariantKind::Scalar(*element_kind),
                actual: single.kind(),
            }),
        }
    }
}

// Vector construction. `count` must equal `values.len()`.
impl VariantValue {
    pub fn from_bool_vector(values: &[bool], count: usize) -> VariantResult<Self> {
        Self::vector(values, count)
    }

    pub fn from_int16_vector(values: &[i16], count: usize) -> VariantResult<Self> {
        Self::vector(values, count)
    }

    pub fn from_int32_vector(values: &[i32], count: usize) -> VariantResult<Self> {
        Self::vector(values, count)
    }

    pub fn from_int64_vector(values: &[i64], count: usize) -> VariantResult<Self> {
        Self::vector(values, count)
    }

    pub fn from_uint16_vector(values: &[u16], count: usize) -> VariantResult<Self> {
        Self::vector(values, count)
    }

    pub fn from_uint32_vector(values: &[u32], count: usize) -> VariantResult<Self> {
        Self::vector(values, count)
    }

    pub fn from_uint64_vector(values: &[u64], count: usize) -> VariantResult<Self> {
        Self::vector(values, count)
    }

    pub fn from_double_vector(values: &[f64], count: usize) -> VariantResult<Self> {
        Self::vector(values, count)
    }

    pub fn from_identifier_vector(values: &[Uuid], count: usize) -> VariantResult<Self> {
        Self::vector(values, count)
    }

    pub fn from_timestamp_vector(values: &[FileTime], count: usize) -> VariantResult<Self> {
        Self::vector(values, count)
    }

    pub fn from_string_vector<S: AsRef<str>>(values: &[S], count: usize) -> VariantResult<Self> {
        let owned = values
            .iter()
            .map(|value| {
                let text = value.as_ref();
                check_text(text).map(|()| text.to_string())
            })
            .collect::<VariantResult<Vec<_>>>()?;
        Self::vector(&owned, count)
    }

    pub fn from_buffer_vector(values: &[Vec<u8>], count: usize) -> VariantResult<Self> {
        Self::vector(values, count)
    }
}

// Inspection and comparison.
impl VariantValue {
    pub fn kind(&self) -> VariantKind {
        match &self.payload {
            Payload::Scalar(scalar) => VariantKind::Scalar(scalar.kind()),
            Payload::Vector { element_kind, .. } => VariantKind::Vector(*element_kind),
        }
    }

    /// Kind of the stored scalar, or of each vector element.
    pub fn element_kind(&self) -> ScalarKind {
        match &self.payload {
            Payload::Scalar(scalar) => scalar.kind(),
            Payload::Vector { element_kind, .. } => *element_kind,
        }
    }

    pub fn is(&self, query: VariantQuery) -> bool {
        match query {
            VariantQuery::String => matches!(self.payload, Payload::Scalar(Scalar::String(_))),
            VariantQuery::Vector => matches!(self.payload, Payload::Vector { .. }),
        }
    }

    /// Number of vector elements; 1 for scalars.
    pub fn element_count(&self) -> usize {
        match &self.payload {
            Payload::Scalar(_) => 1,
            Payload::Vector { elements, .. } => elements.len(),
        }
    }

    /// Orders two values.
    ///
    /// Numeric kinds compare by value across kinds; vectors of the same
    /// element kind compare lexicographically.
    ///
    /// # Errors
    /// - `TypeMismatch` when the kinds are not comparable.
    pub fn compare(&self, other: &VariantValue) -> VariantResult<Ordering> {
        let mismatch = || VariantError::TypeMismatch {
            expected: self.kind(),
            actual: other.kind(),
        };
        match (&self.payload, &other.payload) {
            (Payload::Scalar(left), Payload::Scalar(right)) => {
                compare_scalars(left, right).ok_or_else(mismatch)
            }
            (
                Payload::Vector {
                    element_kind: left_kind,
                    elements: left,
                },
                Payload::Vector {
                    element_kind: right_kind,
                    elements: right,
                },
            ) if left_kind == right_kind => {
                for (a, b) in left.iter().zip(right) {
                    match compare_scalars(a, b) {
                        Some(Ordering::Equal) => {}
                        Some(ordering) => return Ok(ordering),
                        None => return Err(mismatch()),
                    }
                }
                Ok(left.len().cmp(&right.len()))
            }
            _ => Err(mismatch()),
        }
    }
}

impl PartialEq for VariantValue {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.compare(other), Ok(Ordering::Equal))
    }
}

impl PartialOrd for VariantValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

// Cursor extraction.
impl VariantValue {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Repositions the extraction cursor. Bounds are checked by the next read.
    pub fn set_extract_cursor(&mut self, index: usize) -> &mut Self {
        self.cursor = index;
        self
    }

    pub fn next_bool(&mut self) -> VariantResult<bool> {
        self.extract()
    }

    pub fn next_int16(&mut self) -> VariantResult<i16> {
        self.extract()
    }

    pub fn next_int32(&mut self) -> VariantResult<i32> {
        self.extract()
    }

    pub fn next_int64(&mut self) -> VariantResult<i64> {
        self.extract()
    }

    pub fn next_uint16(&mut self) -> VariantResult<u16> {
        self.extract()
    }

    pub fn next_uint32(&mut self) -> VariantResult<u32> {
        self.extract()
    }

    pub fn next_uint64(&mut self) -> VariantResult<u64> {
        self.extract()
    }

    pub fn next_double(&mut self) -> VariantResult<f64> {
        self.extract()
    }

    pub fn next_identifier(&mut self) -> VariantResult<Uuid> {
        self.extract()
    }

    pub fn next_timestamp(&mut self) -> VariantResult<FileTime> {
        self.extract()
    }

    pub fn next_string(&mut self) -> VariantResult<String> {
        self.extract()
    }

    pub fn next_buffer(&mut self) -> VariantResult<Vec<u8>> {
        self.extract()
    }

    /// Extracts the element under the cursor as a standalone scalar value.
    pub fn next_element(&mut self) -> VariantResult<VariantValue> {
        let value = Self::from_element(self, self.cursor)?;
        self.cursor += 1;
        Ok(value)
    }
}

// Coercing conversions. Vectors only convert through the `to_*_vector` family.
impl VariantValue {
    fn to_integer<T: TryFrom<i128>>(&self, target: ScalarKind) -> VariantResult<T> {
        let err = || self.conversion_error(VariantKind::Scalar(target));
        let wide = match self.as_scalar().ok_or_else(err)? {
            Scalar::Bool(value) => i128::from(*value),
            Scalar::Double(value) => {
                let rounded = value.round_ties_even();
                if !rounded.is_finite() {
                    return Err(err());
                }
                // Saturating cast; out-of-range values are rejected below.
                rounded as i128
            }
            Scalar::String(text) => text.trim().parse::<i128>().map_err(|_| err())?,
            other => match other.numeric() {
                Some(Numeric::Int(value)) => value,
                _ => return Err(err()),
            },
        };
        T::try_from(wide).map_err(|_| err())
    }

    pub fn to_bool(&self) -> VariantResult<bool> {
        let err = || self.conversion_error(VariantKind::Scalar(ScalarKind::Bool));
        match self.as_scalar().ok_or_else(err)? {
            Scalar::Bool(value) => Ok(*value),
            Scalar::String(text) => {
                let text = text.trim();
                if text.eq_ignore_ascii_case("true") {
                    Ok(true)
                } else if text.eq_ignore_ascii_case("false") {
                    Ok(false)
                } else if let Ok(number) = text.parse::<i128>() {
                    Ok(number != 0)
                } else {
                    text.parse::<f64>().map(|number| number != 0.0).map_err(|_| err())
                }
            }
            other => match other.numeric() {
                Some(Numeric::Int(value)) => Ok(value != 0),
                Some(Numeric::Float(value)) => Ok(value != 0.0),
                None => Err(err()),
            },
        }
    }

    pub fn to_int16(&self) -> VariantResult<i16> {
        self.to_integer(ScalarKind::Int16)
    }

    pub fn to_int32(&self) -> VariantResult<i32> {
        self.to_integer(ScalarKind::Int32)
    }

    pub fn to_int64(&self) -> VariantResult<i64> {
        self.to_integer(ScalarKind::Int64)
    }

    pub fn to_uint16(&self) -> VariantResult<u16> {
        self.to_integer(ScalarKind::UInt16)
    }

    pub fn to_uint32(&self) -> VariantResult<u32> {
        self.to_integer(ScalarKind::UInt32)
    }

    pub fn to_uint64(&self) -> VariantResult<u64> {
        self.to_integer(ScalarKind::UInt64)
    }

    pub fn to_double(&self) -> VariantResult<f64> {
        let err = || self.conversion_error(VariantKind::Scalar(ScalarKind::Double));
        match self.as_scalar().ok_or_else(err)? {
            Scalar::Bool(value) => Ok(if *value { 1.0 } else { 0.0 }),
            Scalar::String(text) => text.trim().parse::<f64>().map_err(|_| err()),
            other => match other.numeric() {
                Some(Numeric::Int(value)) => Ok(value as f64),
                Some(Numeric::Float(value)) => Ok(value),
                None => Err(err()),
            },
        }
    }

    pub fn to_identifier(&self) -> VariantResult<Uuid> {
        let err = || self.conversion_error(VariantKind::Scalar(ScalarKind::Identifier));
        match self.as_scalar().ok_or_else(err)? {
            Scalar::Identifier(value) => Ok(*value),
            Scalar::String(text) => parse_identifier(text).ok_or_else(err),
            Scalar::Buffer(bytes) => <[u8; 16]>::try_from(bytes.as_slice())
                .map(Uuid::from_bytes_le)
                .map_err(|_| err()),
            _ => Err(err()),
        }
    }

    pub fn to_timestamp(&self) -> VariantResult<FileTime> {
        let err = || self.conversion_error(VariantKind::Scalar(ScalarKind::Timestamp));
        match self.as_scalar().ok_or_else(err)? {
            Scalar::Timestamp(value) => Ok(*value),
            Scalar::UInt64(ticks) => Ok(FileTime::from_ticks(*ticks)),
            _ => Err(err()),
        }
    }

    /// Text form of the value. String vectors are joined with `"; "`.
    pub fn to_text(&self) -> VariantResult<String> {
        let err = || self.conversion_error(VariantKind::Scalar(ScalarKind::String));
        match &self.payload {
            Payload::Vector {
                element_kind: ScalarKind::String,
                ..
            } => Ok(self.to_string_vector()?.join("; ")),
            Payload::Vector { .. } => Err(err()),
            Payload::Scalar(scalar) => match scalar {
                Scalar::Bool(value) => Ok(value.to_string()),
                Scalar::Int16(value) => Ok(value.to_string()),
                Scalar::Int32(value) => Ok(value.to_string()),
                Scalar::Int64(value) => Ok(value.to_string()),
                Scalar::UInt16(value) => Ok(value.to_string()),
                Scalar::UInt32(value) => Ok(value.to_string()),
                Scalar::UInt64(value) => Ok(value.to_string()),
                Scalar::Double(value) => Ok(value.to_string()),
                Scalar::Identifier(value) => Ok(format!("{:X}", value.braced())),
                Scalar::Timestamp(value) => Ok(value.ticks().to_string()),
                Scalar::String(text) => Ok(text.clone()),
                Scalar::Buffer(_) => Err(err()),
            },
        }
    }

    /// Returns the stored text, or `default` when the value is not a string.
    pub fn to_string_or(&self, default: &str) -> String {
        match &self.payload {
            Payload::Scalar(Scalar::String(text)) => text.clone(),
            _ => default.to_string(),
        }
    }

    pub fn to_buffer(&self) -> VariantResult<Vec<u8>> {
        let err = || self.conversion_error(VariantKind::Scalar(ScalarKind::Buffer));
        match self.as_scalar().ok_or_else(err)? {
            Scalar::Buffer(bytes) => Ok(bytes.clone()),
            Scalar::Identifier(value) => Ok(value.to_bytes_le().to_vec()),
            _ => Err(err()),
        }
    }

    pub fn to_bool_vector(&self) -> VariantResult<Vec<bool>> {
        self.to_vector()
    }

    pub fn to_int16_vector(&self) -> VariantResult<Vec<i16>> {
        self.to_vector()
    }

    pub fn to_int32_vector(&self) -> VariantResult<Vec<i32>> {
        self.to_vector()
    }

    pub fn to_int64_vector(&self) -> VariantResult<Vec<i64>> {
        self.to_vector()
    }

    pub fn to_uint16_vector(&self) -> VariantResult<Vec<u16>> {
        self.to_vector()
    }

    pub fn to_uint32_vector(&self) -> VariantResult<Vec<u32>> {
        self.to_vector()
    }

    pub fn to_uint64_vector(&self) -> VariantResult<Vec<u64>> {
        self.to_vector()
    }

    pub fn to_double_vector(&self) -> VariantResult<Vec<f64>> {
        self.to_vector()
    }

    pub fn to_identifier_vector(&self) -> VariantResult<Vec<Uuid>> {
        self.to_vector()
    }

    pub fn to_timestamp_vector(&self) -> VariantResult<Vec<FileTime>> {
        self.to_vector()
    }

    pub fn to_string_vector(&self) -> VariantResult<Vec<String>> {
        self.to_vector()
    }

    pub fn to_buffer_vector(&self) -> VariantResult<Vec<Vec<u8>>> {
        self.to_vector()
    }
}
