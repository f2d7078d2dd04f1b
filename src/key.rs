//! key - ключи B-tree и границы окна скана.
//!
//! Порядок значений (как у движка для BINARY collation):
//! NULL < INTEGER/REAL (сравниваются как числа) < TEXT (побайтово) < BLOB (побайтово).
//! Кортежи сравниваются лексикографически, более короткий префикс меньше.
//!
//! Окно скана задаётся как [min, max) через `Bound`: NegInfinity меньше любого ключа,
//! PosInfinity больше любого ключа; каждая из них равна только самой себе.

use std::cmp::Ordering;

use crate::record::Value;

#[inline]
fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Integer(_) | Value::Real(_) => 1,
        Value::Text(_) => 2,
        Value::Blob(_) => 3,
    }
}

// Точное сравнение i64 с f64 без потери точности на больших значениях.
fn cmp_int_real(i: i64, r: f64) -> Ordering {
    if r.is_nan() {
        return Ordering::Greater;
    }
    if r >= 9_223_372_036_854_775_808.0 {
        return Ordering::Less;
    }
    if r < -9_223_372_036_854_775_808.0 {
        return Ordering::Greater;
    }
    let t = r.trunc();
    match i.cmp(&(t as i64)) {
        Ordering::Equal => 0.0f64.partial_cmp(&(r - t)).unwrap_or(Ordering::Equal),
        o => o,
    }
}

/// Total order over column values.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Integer(x), Value::Integer(y)) => x.cmp(y),
        (Value::Real(x), Value::Real(y)) => x.total_cmp(y),
        (Value::Integer(x), Value::Real(y)) => cmp_int_real(*x, *y),
        (Value::Real(x), Value::Integer(y)) => cmp_int_real(*y, *x).reverse(),
        (Value::Text(x), Value::Text(y)) => x.as_bytes().cmp(y.as_bytes()),
        (Value::Blob(x), Value::Blob(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Lexicographic tuple order; a proper prefix sorts first.
pub fn compare_tuples(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match compare_values(x, y) {
            Ordering::Equal => continue,
            o => return o,
        }
    }
    a.len().cmp(&b.len())
}

/// Ключ B-tree: rowid для table-деревьев, кортеж для index/WITHOUT ROWID.
#[derive(Debug, Clone)]
pub enum Key {
    Rowid(i64),
    Tuple(Vec<Value>),
}

impl Key {
    pub fn as_rowid(&self) -> Option<i64> {
        match self {
            Key::Rowid(r) => Some(*r),
            Key::Tuple(_) => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Key::Rowid(_) => None,
            Key::Tuple(t) => Some(t),
        }
    }

    /// `key_arity` this key implies (0 for rowids).
    pub fn arity(&self) -> usize {
        match self {
            Key::Rowid(_) => 0,
            Key::Tuple(t) => t.len(),
        }
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Key::Rowid(a), Key::Rowid(b)) => a.cmp(b),
            (Key::Tuple(a), Key::Tuple(b)) => compare_tuples(a, b),
            // в одном дереве разные виды ключей не встречаются
            (Key::Rowid(_), Key::Tuple(_)) => Ordering::Less,
            (Key::Tuple(_), Key::Rowid(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl From<i64> for Key {
    fn from(v: i64) -> Self {
        Key::Rowid(v)
    }
}

impl From<Vec<Value>> for Key {
    fn from(v: Vec<Value>) -> Self {
        Key::Tuple(v)
    }
}

impl From<Value> for Key {
    fn from(v: Value) -> Self {
        Key::Tuple(vec![v])
    }
}

/// Граница окна скана.
#[derive(Debug, Clone)]
pub enum Bound {
    NegInfinity,
    Finite(Key),
    PosInfinity,
}

impl Bound {
    /// Compare this bound against a real key.
    pub fn cmp_key(&self, key: &Key) -> Ordering {
        match self {
            Bound::NegInfinity => Ordering::Less,
            Bound::Finite(k) => k.cmp(key),
            Bound::PosInfinity => Ordering::Greater,
        }
    }

    /// Total order over bounds (sentinels equal only to themselves).
    pub fn compare(&self, other: &Bound) -> Ordering {
        match (self, other) {
            (Bound::NegInfinity, Bound::NegInfinity) | (Bound::PosInfinity, Bound::PosInfinity) => {
                Ordering::Equal
            }
            (Bound::NegInfinity, _) | (_, Bound::PosInfinity) => Ordering::Less,
            (_, Bound::NegInfinity) | (Bound::PosInfinity, _) => Ordering::Greater,
            (Bound::Finite(a), Bound::Finite(b)) => a.cmp(b),
        }
    }

    /// `key < self`
    #[inline]
    pub fn above(&self, key: &Key) -> bool {
        self.cmp_key(key) == Ordering::Greater
    }

    /// `key > self`
    #[inline]
    pub fn below(&self, key: &Key) -> bool {
        self.cmp_key(key) == Ordering::Less
    }

    /// `self <= key < max`
    #[inline]
    pub fn window_contains(min: &Bound, max: &Bound, key: &Key) -> bool {
        min.cmp_key(key) != Ordering::Greater && max.above(key)
    }
}

impl PartialEq for Bound {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Bound {}

impl PartialOrd for Bound {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for Bound {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl From<Key> for Bound {
    fn from(k: Key) -> Self {
        Bound::Finite(k)
    }
}

impl From<i64> for Bound {
    fn from(v: i64) -> Self {
        Bound::Finite(Key::Rowid(v))
    }
}

impl From<Vec<Value>> for Bound {
    fn from(v: Vec<Value>) -> Self {
        Bound::Finite(Key::Tuple(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(vals: &[Value]) -> Key {
        Key::Tuple(vals.to_vec())
    }

    #[test]
    fn cross_type_order() {
        let ordered = [
            Value::Null,
            Value::Integer(-5),
            Value::Real(-4.5),
            Value::Integer(0),
            Value::Real(0.5),
            Value::Integer(1),
            Value::Text("A".into()),
            Value::Text("a".into()),
            Value::Text("ab".into()),
            Value::Blob(vec![]),
            Value::Blob(vec![0]),
        ];
        for w in ordered.windows(2) {
            assert_eq!(compare_values(&w[0], &w[1]), Ordering::Less, "{:?} < {:?}", w[0], w[1]);
            assert_eq!(compare_values(&w[1], &w[0]), Ordering::Greater);
        }
    }

    #[test]
    fn numeric_equality_across_int_and_real() {
        assert_eq!(compare_values(&Value::Integer(3), &Value::Real(3.0)), Ordering::Equal);
        assert_eq!(compare_values(&Value::Real(-2.0), &Value::Integer(-2)), Ordering::Equal);
        // large magnitudes stay exact
        assert_eq!(
            compare_values(&Value::Integer(i64::MAX), &Value::Real(9.3e18)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::Integer(i64::MIN), &Value::Real(-9.3e18)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&Value::Integer(-1), &Value::Real(-0.5)),
            Ordering::Less
        );
    }

    #[test]
    fn tuples_lexicographic_prefix_first() {
        let a = t(&[Value::Integer(1)]);
        let b = t(&[Value::Integer(1), Value::Null]);
        let c = t(&[Value::Integer(1), Value::Integer(0)]);
        let d = t(&[Value::Integer(2)]);
        assert!(a < b && b < c && c < d);
        assert_eq!(t(&[Value::Integer(7)]), t(&[Value::Real(7.0)]));
    }

    #[test]
    fn rowids_order_numerically() {
        assert!(Key::Rowid(-1) < Key::Rowid(0));
        assert!(Key::from(10) > Key::from(9));
    }

    #[test]
    fn sentinels_bracket_every_key() {
        let keys = [Key::Rowid(i64::MIN), Key::Rowid(i64::MAX), t(&[]), t(&[Value::Blob(vec![0xFF; 4])])];
        for k in &keys {
            assert!(Bound::NegInfinity.cmp_key(k) == Ordering::Less);
            assert!(Bound::PosInfinity.above(k));
            assert!(Bound::NegInfinity.below(k));
            assert!(Bound::window_contains(&Bound::NegInfinity, &Bound::PosInfinity, k));
        }
        assert_eq!(Bound::NegInfinity, Bound::NegInfinity);
        assert_eq!(Bound::PosInfinity, Bound::PosInfinity);
        assert!(Bound::NegInfinity < Bound::from(i64::MIN));
        assert!(Bound::from(i64::MAX) < Bound::PosInfinity);
        assert!(Bound::NegInfinity < Bound::PosInfinity);
    }

    #[test]
    fn half_open_window() {
        let lo = Bound::from(vec![Value::Text("b".into())]);
        let hi = Bound::from(vec![Value::Text("d".into())]);
        let inside = t(&[Value::Text("b".into())]);
        let at_hi = t(&[Value::Text("d".into())]);
        let before = t(&[Value::Text("a".into())]);
        assert!(Bound::window_contains(&lo, &hi, &inside));
        assert!(!Bound::window_contains(&lo, &hi, &at_hi));
        assert!(!Bound::window_contains(&lo, &hi, &before));
    }
}
