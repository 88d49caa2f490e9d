//! Arbitrary-precision signed integer arithmetic for magia.
//!
//! This crate provides a sign-magnitude big integer sized for values of a
//! few hundred decimal digits, built on a 32-bit-limb magnitude engine:
//! schoolbook multiplication, dedicated squaring, Knuth Algorithm D
//! division, binary GCD, Newton integer square root, and a staged Barrett
//! reduction by 10^9 for decimal rendering.
//!
//! # Overview
//!
//! - [`SignedInt`]: the immutable value type carrying the full signed
//!   algebra, text and binary I/O, and mixed-primitive operators.
//! - [`Accumulator`]: a mutable value that reuses its buffers, for
//!   aggregation loops that must not allocate.
//! - [`Barrett`]: a precomputed reciprocal for repeated reduction by one
//!   fixed modulus.
//! - [`Sign`]: the two-valued sign with its branch-free mask forms.
//!
//! # Example
//!
//! ```
//! use magia::{Accumulator, SignedInt};
//!
//! let a: SignedInt = "123_456_789_012_345_678_901_234_567_890".parse().unwrap();
//! let b = SignedInt::from(-987_654_321i64);
//!
//! let (q, r) = a.div_rem(&b).unwrap();
//! assert_eq!(&q * &b + &r, a);
//!
//! let mut sum_of_squares = Accumulator::new();
//! for term in [&a, &b] {
//!     sum_of_squares.add_square_of(term);
//! }
//! assert!(sum_of_squares.to_signed_int() > SignedInt::ZERO);
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod accumulator;
mod barrett;
mod error;
mod magia;
mod sign;
mod signed;
mod stream;

pub use accumulator::Accumulator;
pub use barrett::Barrett;
pub use error::MagiaError;
pub use sign::Sign;
pub use signed::{SignedInt, SmallOperand};
pub use stream::AsciiStream;
