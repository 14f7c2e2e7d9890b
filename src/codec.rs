//! SimpleMRS text codec.
//!
//! SimpleMRS is the bracketed text form engines print for a semantic graph:
//!
//! ```text
//! [ TOP: h0 INDEX: e2 [ e TENSE: pres ]
//!   RELS: < [ _the_q_rel<0:3> LBL: h4 ARG0: x3 [ x PERS: 3 ] RSTR: h5 BODY: h6 ]
//!           [ _dog_n_1_rel<4:7> LBL: h7 ARG0: x3 ]
//!           [ _bark_v_1_rel<8:14> LBL: h1 ARG0: e2 ARG1: x3 ] >
//!   HCONS: < h0 qeq h1 h5 qeq h7 > ]
//! ```
//!
//! ## Responsibilities by module
//!
//! - `tokenizer.rs`: splits text into quoted strings, bare runs and the
//!   reserved characters `: # @ [ ] < >`.
//! - `reader.rs`: recursive descent from tokens to [`Mrs`](crate::Mrs); EP ids
//!   are assigned from [`FIRST_NODE_ID`](crate::FIRST_NODE_ID).
//! - `writer.rs`: the inverse, for versions 1.0 and 1.1, compact or pretty.
//!
//! Reading what was written gives back an equal graph:
//!
//! ```
//! use demophin::codec::{self, WriteOptions};
//!
//! let m = codec::loads_one("[ TOP: h0 RELS: < [ _rain_v_1_rel LBL: h1 ARG0: e2 ] > HCONS: < h0 qeq h1 > ]").unwrap();
//! let text = codec::dumps_one(&m, &WriteOptions::default());
//! assert_eq!(codec::loads_one(&text).unwrap(), m);
//! ```

#[path = "codec/reader.rs"]
mod reader;
#[path = "codec/tokenizer.rs"]
mod tokenizer;
#[path = "codec/writer.rs"]
mod writer;

pub use reader::{load, loads, loads_one};
pub use tokenizer::tokenize;
pub use writer::{Features, Version, WriteOptions, dump, dumps, dumps_one, role_sort_key};
