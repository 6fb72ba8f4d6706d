//! # modgen
//!
//! Building blocks for a storefront module generator. A generator run copies a
//! module skeleton, fills in its placeholders, drops a fitted logo into it,
//! and packs the result into an uploadable zip:
//!
//! ```text
//! skeleton/  ──copy_tree──▶  build/mymodule/  ──substitute──▶  (placeholders filled)
//! logo.jpg   ──fit_image──▶  build/mymodule/logo.png
//! build/mymodule/  ──zip_directory──▶  mymodule.zip   (entries under mymodule/)
//! ```
//!
//! Each step is an independent library function; the `modgen` binary exposes
//! them as subcommands.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Aspect-preserving fit of an image into a target box, with upscale guard and centering |
//! | [`tree`] | Recursive copy and delete of directory trees |
//! | [`template`] | Literal placeholder substitution in files, hook method bodies |
//! | [`archive`] | Zip packaging of a module directory under its own name |
//! | [`config`] | `modgen.toml` loading, validation, and merging over stock defaults |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Never Enlarge
//!
//! A logo smaller than the target box on both axes is centered at its original
//! size instead of being scaled up. Upscaled thumbnails look soft, and a small
//! crisp image on a transparent canvas reads better in a shop back office.
//!
//! ## Height Decides the Scale
//!
//! When the source has to shrink, the scale factor comes from the height
//! alone. In the default fixed canvas mode a very wide source therefore
//! overflows the box horizontally and is clipped symmetrically; the scaled
//! canvas mode widens the canvas to fit instead.
//!
//! ## Check Before Decoding
//!
//! Every check that can be answered from the file header runs before any
//! pixels are decoded: icon files are rejected and the decoded buffer size is
//! compared against a memory ceiling using the decoder's real color type. A
//! rejected source never produces a partial output file.
//!
//! ## Pure-Rust Stack
//!
//! Decoding, resampling, and encoding use the `image` crate; archives use
//! `zip`. There are no system library or external binary dependencies.

pub mod archive;
pub mod config;
pub mod imaging;
pub mod output;
pub mod template;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_helpers;
