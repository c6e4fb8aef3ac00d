use serde::{Deserialize, Serialize};

use crate::element::ElementKind;

/// The compression mode requested by a run configuration.
///
/// Only `None` has a shipped strategy. The other modes are recognized
/// configuration surface whose numeric semantics (rounding, quantization
/// step, error accumulation across partial decodes) are still unspecified;
/// the factory rejects them instead of guessing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionSpec {
    None,
    Fp16,
    Threshold { cutoff: f32 },
}

impl Default for CompressionSpec {
    fn default() -> Self {
        Self::None
    }
}

/// The run-configuration record the codec factory consumes.
///
/// This is a wire-level contract shared during node bootstrap. It avoids
/// referencing concrete strategy types so that transport crates do not
/// depend on codec internals; `params` carries arbitrary JSON configuration
/// for the selected strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSpec {
    #[serde(default = "default_element")]
    pub element: ElementKind,
    #[serde(default)]
    pub compression: CompressionSpec,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl Default for SyncSpec {
    fn default() -> Self {
        Self {
            element: ElementKind::F32,
            compression: CompressionSpec::None,
            params: serde_json::Value::Null,
        }
    }
}

fn default_element() -> ElementKind {
    ElementKind::F32
}
