// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Functions come in `_sqlite` and `_mysql` versions, generated by
//! `backend_fn!` or written out by hand where a body must call another
//! backend-specific function.

pub mod identities;
pub mod shift_requests;
pub mod shifts;
pub mod shops;
pub mod workers;
