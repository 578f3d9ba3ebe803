use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RelationNode {
    #[serde(default, deserialize_with = "deserialize_relation_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sambandsnummer: Option<String>,
    #[serde(default)]
    pub depth: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_relations")]
    pub parents: Vec<RelationNode>,
    #[serde(default, deserialize_with = "deserialize_relations")]
    pub children: Vec<RelationNode>,
}

impl RelationNode {
    pub fn next_relations(&self, ancestors: bool) -> &[RelationNode] {
        if ancestors {
            &self.parents
        } else {
            &self.children
        }
    }

    pub fn without_nested(&self) -> RelationNode {
        RelationNode {
            id: self.id.clone(),
            name: self.name.clone(),
            sambandsnummer: self.sambandsnummer.clone(),
            depth: self.depth,
            parents: Vec::new(),
            children: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct HierarchyDocument {
    #[serde(default, deserialize_with = "deserialize_relations")]
    pub parent_tree: Vec<RelationNode>,
    #[serde(default, deserialize_with = "deserialize_relations")]
    pub child_tree: Vec<RelationNode>,
}

impl HierarchyDocument {
    pub fn relation_count(&self) -> usize {
        fn count(relations: &[RelationNode]) -> usize {
            relations
                .iter()
                .map(|relation| 1 + count(&relation.parents) + count(&relation.children))
                .sum()
        }

        count(&self.parent_tree) + count(&self.child_tree)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SambandSummary {
    #[serde(default, deserialize_with = "deserialize_relation_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sambandsnummer: Option<String>,
}

pub fn extract_direct_relations(relations: &[RelationNode]) -> Vec<RelationNode> {
    relations.iter().map(RelationNode::without_nested).collect()
}

// The API serializes UUID primary keys as strings, but older fixtures carry
// integer ids. Empty strings and zero count as missing.
fn deserialize_relation_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) if !text.is_empty() => Some(text),
        Some(Value::Number(number)) if number.as_f64().is_some_and(|n| n != 0.0) => {
            Some(number.to_string())
        }
        _ => None,
    })
}

fn deserialize_relations<'de, D>(deserializer: D) -> Result<Vec<RelationNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<RelationNode>>::deserialize(deserializer)?.unwrap_or_default())
}
