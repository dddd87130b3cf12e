pub mod run;
pub mod collect;
pub mod show;
