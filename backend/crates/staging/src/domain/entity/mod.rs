pub mod staged_batch;
