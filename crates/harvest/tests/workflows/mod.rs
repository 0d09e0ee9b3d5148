use super::*;

mod pipeline_run;
mod stored_output;
