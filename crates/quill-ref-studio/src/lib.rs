//! # quill-ref-studio
//!
//! Offline writing-studio reference runtime for the QUILL engine.
//!
//! Demonstrates three workflows against a scripted model:
//!
//! 1. **First Draft**: outline, planning notes, and a parallel chapter batch
//!    with an injected failure that a second batch retries.
//! 2. **Revision Pass**: dialogue doctor, refine, continue, and editor review
//!    on a drafted manuscript.
//! 3. **Autopilot**: the cheapest-legal-action loop running to its limit.
//!
//! All manuscript text is hardcoded and fictional. No external API calls are made.

pub mod mock_data;
pub mod model;
pub mod scenarios;

pub use model::ScriptedModel;
