//! Backend commands queued from UI to backend worker.

use shared::protocol::GenerateMeditationRequest;

#[derive(Debug)]
pub enum BackendCommand {
    GenerateMeditation { request: GenerateMeditationRequest },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GenerateMeditation { .. } => "generate_meditation",
        }
    }
}
