use alloc::string::String;
use core::fmt;
use core::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::comparator::Comparator;
use crate::somap::SoMap;
use crate::soset::SoSet;
use crate::value::Value;

// ─── SoMap ───────────────────────────────────────────────────────────────────

impl<K: Serialize, V: Serialize, C> Serialize for SoMap<K, V, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct SoMapVisitor<K, V, C> {
    marker: PhantomData<fn() -> SoMap<K, V, C>>,
}

impl<'de, K, V, C> Visitor<'de> for SoMapVisitor<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Comparator<K> + Default,
{
    type Value = SoMap<K, V, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = SoMap::with_ordering(C::default());
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value).map_err(de::Error::custom)?;
        }
        Ok(map)
    }
}

/// Entries are inserted in the order they are read, with the comparator's `Default`.
impl<'de, K, V, C> Deserialize<'de> for SoMap<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Comparator<K> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SoMapVisitor { marker: PhantomData })
    }
}

// ─── SoSet ───────────────────────────────────────────────────────────────────

impl<T: Serialize, C> Serialize for SoSet<T, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for value in self {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

struct SoSetVisitor<T, C> {
    marker: PhantomData<fn() -> SoSet<T, C>>,
}

impl<'de, T, C> Visitor<'de> for SoSetVisitor<T, C>
where
    T: Deserialize<'de> + Clone,
    C: Comparator<T> + Default,
{
    type Value = SoSet<T, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut set = SoSet::with_ordering(C::default());
        while let Some(value) = access.next_element()? {
            set.add(value).map_err(de::Error::custom)?;
        }
        Ok(set)
    }
}

impl<'de, T, C> Deserialize<'de> for SoSet<T, C>
where
    T: Deserialize<'de> + Clone,
    C: Comparator<T> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(SoSetVisitor { marker: PhantomData })
    }
}

// ─── Value ───────────────────────────────────────────────────────────────────

/// `Undefined` and `Null` both serialize as a unit/none; both read back as `Null`.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined => serializer.serialize_unit(),
            Value::Null => serializer.serialize_none(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("null, a boolean, a number or a string")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Boolean(b))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_i64<E: de::Error>(self, n: i64) -> Result<Value, E> {
        Ok(Value::Number(n as f64))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E: de::Error>(self, n: u64) -> Result<Value, E> {
        Ok(Value::Number(n as f64))
    }

    fn visit_f64<E: de::Error>(self, n: f64) -> Result<Value, E> {
        Ok(Value::Number(n))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Value, E> {
        Ok(Value::from(s))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Value, E> {
        Ok(Value::String(s))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::comparator::{Natural, Reversed};
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn map_serializes_in_key_order() {
        let map = SoMap::from_entries([("b", 2), ("a", 1), ("c", 3)]).unwrap();
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"a":1,"b":2,"c":3}"#);
    }

    #[test]
    fn map_reads_back_with_default_comparator() {
        let map: SoMap<String, u8, Reversed<Natural>> = serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap();
        assert_eq!(map.to_string(), "SoMap 2 { b => 2, a => 1 }");
    }

    #[test]
    fn set_round_trip() {
        let set = SoSet::from_values([3, 1, 2]).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[1,2,3]");
        let back: SoSet<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn mixed_values_fail_to_deserialize() {
        let error = serde_json::from_str::<SoSet<Value>>(r#"[1, "one"]"#).unwrap_err();
        assert!(error.to_string().contains("keys are not of the same kind"));
    }

    #[test]
    fn values_read_from_json_scalars() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, true, 2, -3, 1.5, "s"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::from(true),
                Value::from(2),
                Value::from(-3),
                Value::from(1.5),
                Value::from("s"),
            ]
        );
        assert_eq!(serde_json::to_string(&Value::Undefined).unwrap(), "null");
    }
}
