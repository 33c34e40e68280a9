//! Named bind parameters.
//!
//! Each bind call reserves one tag and numbers its values from zero, so a call
//! binding three values yields `:AAB0, :AAB1, :AAB2`. Tags come from a
//! per-statement counter (`AAA`, `AAB`, ..., `ZZZ`, `BAAA`, ...) and never
//! repeat, which keeps SQL placeholders and bind keys in one-to-one
//! correspondence.

use crate::value::Value;
use std::collections::BTreeMap;

/// Placeholder name (without the leading `:`) to bound literal.
pub type BindMap = BTreeMap<String, Value>;

const TAG_WIDTH: usize = 3;

/// Render `n` in base 26 with letters, left-padded with `A` to [`TAG_WIDTH`].
fn tag_for(mut n: usize) -> String {
    let mut letters = Vec::with_capacity(TAG_WIDTH);
    loop {
        letters.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
        if n == 0 {
            break;
        }
    }
    while letters.len() < TAG_WIDTH {
        letters.push('A');
    }
    letters.iter().rev().collect()
}

/// Collects bound values for one statement.
#[derive(Clone, Debug, Default)]
pub(crate) struct Binds {
    values: BindMap,
    calls: usize,
}

impl Binds {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn next_tag(&mut self) -> String {
        let tag = tag_for(self.calls);
        self.calls += 1;
        tag
    }

    /// Bind a single value and return its placeholder.
    pub(crate) fn bind(&mut self, value: &Value) -> String {
        let key = format!("{}0", self.next_tag());
        let placeholder = format!(":{key}");
        self.values.insert(key, value.clone());
        placeholder
    }

    /// Bind every value under one fresh tag and return the placeholders in order.
    pub(crate) fn bind_all(&mut self, values: &[Value]) -> Vec<String> {
        let tag = self.next_tag();
        values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let key = format!("{tag}{i}");
                let placeholder = format!(":{key}");
                self.values.insert(key, value.clone());
                placeholder
            })
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn into_map(self) -> BindMap {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_count_up_in_letters() {
        assert_eq!(tag_for(0), "AAA");
        assert_eq!(tag_for(1), "AAB");
        assert_eq!(tag_for(25), "AAZ");
        assert_eq!(tag_for(26), "ABA");
        assert_eq!(tag_for(26 * 26 * 26 - 1), "ZZZ");
        assert_eq!(tag_for(26 * 26 * 26), "BAAA");
    }

    #[test]
    fn single_bind_uses_index_zero() {
        let mut binds = Binds::new();
        assert_eq!(binds.bind(&Value::Int(5)), ":AAA0");
        assert_eq!(binds.bind(&Value::Int(6)), ":AAB0");

        let map = binds.into_map();
        assert_eq!(map.get("AAA0"), Some(&Value::Int(5)));
        assert_eq!(map.get("AAB0"), Some(&Value::Int(6)));
    }

    #[test]
    fn bind_all_shares_one_tag() {
        let mut binds = Binds::new();
        binds.bind(&Value::Null);
        let placeholders = binds.bind_all(&[Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(placeholders, vec![":AAB0", ":AAB1", ":AAB2"]);
        assert_eq!(binds.len(), 4);
    }

    #[test]
    fn keys_stay_unique_across_many_calls() {
        let mut binds = Binds::new();
        for i in 0..20_000 {
            binds.bind(&Value::Int(i));
        }
        assert_eq!(binds.len(), 20_000);
    }
}
