// Application layer: concrete pipelines wiring storage, config and the core.

pub mod dry_run;
pub mod pipelines;
