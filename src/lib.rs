//!  __activeqp__ is a dense primal active-set solver for convex quadratic programs.
//!  It solves problems of the form
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & \frac{1}{2}x^T Q x + p^T x\\\\\[2ex\]
//!  \text{subject to} & Gx \le h \\\\\[1ex\]
//!         & Ax = b
//!  \end{array}
//! $$
//!
//! with decision variable $x \in \mathbb{R}^n$ and dense data matrices
//! $Q=Q^\top \succeq 0$,
//! $p \in \mathbb{R}^n$,
//! $G \in \mathbb{R}^{m \times n}$, $h \in \mathbb{R}^m$,
//! $A \in \mathbb{R}^{k \times n}$ and $b \in \mathbb{R}^k$.
//!
//! ## Features
//!
//! * __Two phases__: if the starting point violates an inequality, an
//!   auxiliary linear program is solved first to find a feasible point, or
//!   to prove that none exists.
//!
//! * __Redundant equalities__: linearly dependent rows of $A$ are detected
//!   and dropped when consistent.  Inconsistent rows are reported as
//!   infeasibility.
//!
//! * __Semidefinite objectives__: singular working set problems are solved in
//!   the null space of the active constraints, which also detects problems
//!   whose objective is unbounded below.
//!
//! * __Multipliers__: solutions carry Lagrange multipliers satisfying
//!   $Qx + p + A^T\nu + G^T\lambda = 0$ with $\lambda \ge 0$.
//!
//! The solver is intended for small and medium problems held in dense
//! column major storage.  See [`solve`](crate::solver::solve) for a usage example.

//Rust hates greek characters
#![allow(confusable_idents)]

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub mod io;
pub mod solver;
pub mod timers;
