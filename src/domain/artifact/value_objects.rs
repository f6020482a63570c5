//! Artifact Context - Value Objects

use serde::{Deserialize, Serialize};

use crate::domain::book::Position;

/// 产物类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// 剧情摘要
    Summary,
    /// 人物列表
    Characters,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Summary => "summary",
            ArtifactKind::Characters => "characters",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "summary" => Some(ArtifactKind::Summary),
            "characters" => Some(ArtifactKind::Characters),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 人物条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterEntry {
    pub name: String,
    pub description: String,
    /// 首次出场位置（不超过所属产物的位置）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_appearance: Option<Position>,
}

impl CharacterEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            first_appearance: None,
        }
    }

    pub fn with_first_appearance(mut self, position: Position) -> Self {
        self.first_appearance = Some(position);
        self
    }
}

/// 产物内容（规范化后的 Provider 输出）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArtifactPayload {
    Summary { content: String },
    Characters { characters: Vec<CharacterEntry> },
}

impl ArtifactPayload {
    pub fn summary(content: impl Into<String>) -> Self {
        ArtifactPayload::Summary {
            content: content.into(),
        }
    }

    pub fn characters(characters: Vec<CharacterEntry>) -> Self {
        ArtifactPayload::Characters { characters }
    }

    pub fn kind(&self) -> ArtifactKind {
        match self {
            ArtifactPayload::Summary { .. } => ArtifactKind::Summary,
            ArtifactPayload::Characters { .. } => ArtifactKind::Characters,
        }
    }

    /// 没有任何有效内容（空摘要或空人物列表）
    pub fn is_empty(&self) -> bool {
        match self {
            ArtifactPayload::Summary { content } => content.trim().is_empty(),
            ArtifactPayload::Characters { characters } => characters.is_empty(),
        }
    }

    /// 将人物首次出场位置限制在 `position` 之内，缺失时补为 `position`
    pub fn bounded_to(self, position: Position) -> Self {
        match self {
            ArtifactPayload::Characters { characters } => ArtifactPayload::Characters {
                characters: characters
                    .into_iter()
                    .map(|mut c| {
                        c.first_appearance = Some(
                            c.first_appearance
                                .map(|p| p.min(position))
                                .unwrap_or(position),
                        );
                        c
                    })
                    .collect(),
            },
            summary => summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip_names() {
        for kind in [ArtifactKind::Summary, ArtifactKind::Characters] {
            assert_eq!(ArtifactKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(ArtifactKind::from_str("glossary"), None);
    }

    #[test]
    fn test_bounded_to_clamps_first_appearance() {
        let payload = ArtifactPayload::characters(vec![
            CharacterEntry::new("Emma", "Handsome, clever, and rich")
                .with_first_appearance(Position::new(900)),
            CharacterEntry::new("Mr. Knightley", "A neighbour").with_first_appearance(Position::new(12)),
            CharacterEntry::new("Harriet", "A friend"),
        ]);

        let ArtifactPayload::Characters { characters } = payload.bounded_to(Position::new(600)) else {
            panic!("expected characters");
        };
        assert_eq!(characters[0].first_appearance, Some(Position::new(600)));
        assert_eq!(characters[1].first_appearance, Some(Position::new(12)));
        assert_eq!(characters[2].first_appearance, Some(Position::new(600)));
    }

    #[test]
    fn test_payload_json_shape() {
        let json = serde_json::to_value(ArtifactPayload::summary("Summary text")).unwrap();
        assert_eq!(json["type"], "summary");
        assert_eq!(json["content"], "Summary text");
    }
}
