// Cross-cutting LLM call parameters. Each service that needs LLM calls
// defines its own prompts.rs alongside it; this file holds the shared pieces.

/// Default sampling temperature for analysis calls.
pub const ANALYSIS_TEMPERATURE: f32 = 0.7;

/// Lower temperature for the focused improvement prompt, which must stay
/// close to the source text so replacements can be located verbatim.
pub const IMPROVEMENT_TEMPERATURE: f32 = 0.3;
