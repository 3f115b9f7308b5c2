//! Statistical reduction of benchmark samples
//!
//! # Examples
//!
//! ```
//! use msock_bench::stats::Summary;
//!
//! let samples = vec![150.0, 152.0, 148.0, 151.0, 149.0];
//! let summary = Summary::from_samples(&samples).unwrap();
//! println!("avg: {:.3}ns, dev: {:.3}ns", summary.mean, summary.std_dev);
//! ```

pub mod summary;

pub use summary::{mean_and_deviation, Summary};
