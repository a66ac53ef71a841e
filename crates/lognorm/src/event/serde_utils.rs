use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::Serializer;

use super::Value;

/// Serialize flat dotted paths as nested JSON objects.
///
/// `{"source.ip": "1.2.3.4", "source.port": 80}` becomes
/// `{"source": {"ip": "1.2.3.4", "port": 80}}`. When a path is both a leaf
/// and a parent (`a` and `a.b`), the longer path is kept under its full
/// dotted key at the level where the clash happens.
pub fn serialize_paths_as_tree<S>(fields: &BTreeMap<String, Value>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let tree = build_tree(fields);
    let mut map = serializer.serialize_map(Some(tree.len()))?;
    for (k, v) in &tree {
        map.serialize_entry(k, v)?;
    }
    map.end()
}

fn build_tree(fields: &BTreeMap<String, Value>) -> serde_json::Map<String, serde_json::Value> {
    let mut root = serde_json::Map::new();
    for (path, value) in fields {
        let leaf = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(_) => continue,
        };
        insert_path(&mut root, path, leaf);
    }
    root
}

fn insert_path(node: &mut serde_json::Map<String, serde_json::Value>, path: &str, leaf: serde_json::Value) {
    match path.split_once('.') {
        None => {
            node.insert(path.to_string(), leaf);
        }
        Some((head, rest)) => {
            let child = node
                .entry(head.to_string())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            match child {
                serde_json::Value::Object(inner) => insert_path(inner, rest, leaf),
                _ => {
                    node.insert(path.to_string(), leaf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serialize(fields: &[(&str, Value)]) -> String {
        use serde::Serialize;

        struct Wrapper(BTreeMap<String, Value>);

        impl Serialize for Wrapper {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serialize_paths_as_tree(&self.0, serializer)
            }
        }

        let map = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        serde_json::to_string(&Wrapper(map)).unwrap()
    }

    #[test]
    fn test_serialize_empty() {
        assert_eq!(serialize(&[]), "{}");
    }

    #[test]
    fn test_serialize_nested_paths() {
        let json = serialize(&[
            ("source.ip", Value::from("1.2.3.4")),
            ("source.port", Value::Long(80)),
            ("message", Value::from("raw")),
        ]);
        assert_eq!(json, r#"{"message":"raw","source":{"ip":"1.2.3.4","port":80}}"#);
    }

    #[test]
    fn test_leaf_and_parent_clash_keeps_both() {
        let json = serialize(&[("a", Value::from("leaf")), ("a.b", Value::from("child"))]);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["a"], "leaf");
        assert_eq!(parsed["a.b"], "child");
    }

    #[test]
    fn test_serialize_special_characters() {
        let json = serialize(&[("msg", Value::from("line with \"quotes\" and \\backslashes"))]);
        let _: serde_json::Value = serde_json::from_str(&json).unwrap();
    }
}
