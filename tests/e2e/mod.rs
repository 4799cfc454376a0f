// End-to-end tests for the podcast pipeline.
//
// The content and voice services are replaced by in-process mocks; everything
// else (synthesis worker pool, artifact storage, WAV assembly) runs for real
// against a temporary output directory.

mod helpers;
mod test_combine;
mod test_pipeline;
