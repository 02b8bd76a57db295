use serde::{Deserialize, Serialize};

/// 传感器描述（发现窗口内每个通道上报一次）。
///
/// 所有字段按原文保存，不做数值转换，由下游决定如何解释。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorDescriptor {
    pub id: String,
    pub name: String,
    pub step: String,
    pub unit: String,
    pub max: Option<String>,
    pub min: Option<String>,
}

/// 传感器注册表：按上报顺序追加，窗口结束后只读。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    descriptors: Vec<SensorDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加描述（不去重）。
    pub fn push(&mut self, descriptor: SensorDescriptor) {
        self.descriptors.push(descriptor);
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn as_slice(&self) -> &[SensorDescriptor] {
        &self.descriptors
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorDescriptor> {
        self.descriptors.iter()
    }
}

/// 单条读数：逐行构造，分发后即丢弃。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRecord {
    /// 发送方 ID（第一个字段原文）
    pub sender: String,
    pub value: f64,
}
