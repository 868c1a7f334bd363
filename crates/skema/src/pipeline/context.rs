/// Stage outputs of a single pipeline run.
///
/// Fields are filled as stages complete, so when a later stage fails the
/// caller still sees everything produced before the failure point — an
/// import whose LLM call fails keeps the text that extraction recovered.
#[derive(Debug, Default)]
pub struct PipelineContext {
    // Stage 1 result — set once text extraction succeeds
    pub text: Option<String>,

    // Stage 3 result — set once the extracted object validates
    pub extracted_json: Option<String>,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }
}
