//! Dockerfile instructions and rendering

use std::fmt::{self, Write as _};

/// Supported Dockerfile instructions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    From { image: String, alias: String },
    Env { key: String, value: String },
    Workdir(String),
    Run(String),
    Copy { src: Vec<String>, dest: String },
    Expose(u16),
    /// Exec form: `CMD ["prog", "arg"]`
    Cmd(Vec<String>),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::From { image, alias } => write!(f, "FROM {} AS {}", image, alias),
            Instruction::Env { key, value } => write!(f, "ENV {}={}", key, value),
            Instruction::Workdir(dir) => write!(f, "WORKDIR {}", dir),
            Instruction::Run(script) => write!(f, "RUN {}", script),
            Instruction::Copy { src, dest } => write!(f, "COPY {} {}", src.join(" "), dest),
            Instruction::Expose(port) => write!(f, "EXPOSE {}", port),
            Instruction::Cmd(argv) => {
                let quoted: Vec<String> = argv
                    .iter()
                    .map(|a| serde_json::Value::String(a.clone()).to_string())
                    .collect();
                write!(f, "CMD [{}]", quoted.join(", "))
            }
        }
    }
}

/// A named build stage
#[derive(Debug, Clone)]
pub struct BuildStage {
    pub name: String,
    pub instructions: Vec<Instruction>,
}

impl BuildStage {
    pub fn from(parent: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            instructions: vec![Instruction::From {
                image: parent.to_string(),
                alias: name.to_string(),
            }],
        }
    }

    pub fn push(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    pub fn env(self, key: &str, value: &str) -> Self {
        self.push(Instruction::Env {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    pub fn run(self, script: &str) -> Self {
        self.push(Instruction::Run(script.to_string()))
    }

    pub fn copy(self, src: &[&str], dest: &str) -> Self {
        self.push(Instruction::Copy {
            src: src.iter().map(|s| s.to_string()).collect(),
            dest: dest.to_string(),
        })
    }

    pub fn cmd(self, argv: &[&str]) -> Self {
        self.push(Instruction::Cmd(argv.iter().map(|s| s.to_string()).collect()))
    }
}

/// Multi-stage Dockerfile
#[derive(Debug, Clone, Default)]
pub struct Dockerfile {
    pub stages: Vec<BuildStage>,
}

impl Dockerfile {
    #[cfg(test)]
    pub fn stage(&self, name: &str) -> Option<&BuildStage> {
        self.stages.iter().find(|s| s.name == name)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for instruction in &stage.instructions {
                // writing to a String cannot fail
                let _ = writeln!(out, "{}", instruction);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_instructions() {
        let stage = BuildStage::from("python:3.12-slim", "base")
            .env("PYTHONUNBUFFERED", "1")
            .copy(&["Pipfile", "Pipfile.lock"], "./")
            .push(Instruction::Expose(8000))
            .cmd(&["uvicorn", "src.main:app"]);
        let text = Dockerfile { stages: vec![stage] }.render();
        assert_eq!(
            text,
            "FROM python:3.12-slim AS base\n\
             ENV PYTHONUNBUFFERED=1\n\
             COPY Pipfile Pipfile.lock ./\n\
             EXPOSE 8000\n\
             CMD [\"uvicorn\", \"src.main:app\"]\n"
        );
    }

    #[test]
    fn test_stages_are_separated() {
        let file = Dockerfile {
            stages: vec![
                BuildStage::from("python:3.12-slim", "base"),
                BuildStage::from("base", "development"),
            ],
        };
        assert_eq!(
            file.render(),
            "FROM python:3.12-slim AS base\n\nFROM base AS development\n"
        );
        assert!(file.stage("development").is_some());
        assert!(file.stage("production").is_none());
    }
}
