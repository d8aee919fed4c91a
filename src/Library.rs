/// Catalogue of industrial reactions as reusable reactor set-ups
/// (reactions, feed, target product, catalyst, temperature window).
/// The built-in catalogue is plain JSON data embedded in the crate; user
/// catalogues with the same shape are loaded from files.
///
///  # Examples
/// ```
/// use KiCSTR::Library::reaction_library::ReactionLibrary;
/// let library = ReactionLibrary::builtin().unwrap();
/// let bundle = library.get("Water Gas Shift Reaction").unwrap();
/// let config = bundle.to_reactor_config(1.0, 0.01, 0.0);
/// assert_eq!(config.target_product.as_deref(), Some("H2"));
/// ```
pub mod reaction_library;
