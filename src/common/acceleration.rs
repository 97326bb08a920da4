use serde::{Deserialize, Serialize};

/// Hardware delegate requested for inference.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Acceleration {
    #[default] Cpu,
    Gpu,
}

// Hardcoded delegate names. Storing the "proper" spelling and the lowercase version.
const CPU: [&str; 2] = ["CPU", "cpu"];
const GPU: [&str; 2] = ["GPU", "gpu"];

impl Acceleration {
    pub fn from_str(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "cpu" => Some(Acceleration::Cpu),
            "gpu" => Some(Acceleration::Gpu),
            _ => None,
        }
    }

    pub fn str(&self) -> &'static str {
        match self {
            Acceleration::Cpu => CPU[0],
            Acceleration::Gpu => GPU[0],
        }
    }

    pub fn str_lowercase(&self) -> &'static str {
        match self {
            Acceleration::Cpu => CPU[1],
            Acceleration::Gpu => GPU[1],
        }
    }

    pub fn all_accelerations() -> Vec<String> {
        vec![
            Acceleration::Cpu.str_lowercase().to_string(),
            Acceleration::Gpu.str_lowercase().to_string(),
        ]
    }

    pub fn is_valid_acceleration(name: &str) -> bool {
        Acceleration::from_str(name).is_some()
    }
}

impl std::fmt::Display for Acceleration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.str())
    }
}
