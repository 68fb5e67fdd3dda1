//! Command → glyph lookup used for commands without structural meaning.
//!
//! The parser only depends on the [`SymbolTable`] trait; [`StandardSymbols`]
//! is the built-in table and can be replaced per parser instance.

use fxhash::FxHashMap;
use phf::phf_map;

/// Static name → glyph lookup. Implementations must be pure.
pub trait SymbolTable {
    /// Glyph for a command name (without backslash), if known.
    fn lookup(&self, name: &str) -> Option<&str>;
}

/// The built-in symbol set.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardSymbols;

impl SymbolTable for StandardSymbols {
    fn lookup(&self, name: &str) -> Option<&str> {
        SYMBOLS.get(name).copied()
    }
}

/// A table that checks user-supplied entries before falling back to
/// [`StandardSymbols`].
#[derive(Debug, Clone, Default)]
pub struct ExtendedSymbols {
    extra: FxHashMap<String, String>,
}

impl ExtendedSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, glyph: impl Into<String>) -> Self {
        self.extra.insert(name.into(), glyph.into());
        self
    }
}

impl SymbolTable for ExtendedSymbols {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.extra
            .get(name)
            .map(String::as_str)
            .or_else(|| SYMBOLS.get(name).copied())
    }
}

static SYMBOLS: phf::Map<&'static str, &'static str> = phf_map! {
    // Greek lowercase
    "alpha" => "α", "beta" => "β", "gamma" => "γ", "delta" => "δ",
    "epsilon" => "ϵ", "varepsilon" => "ε", "zeta" => "ζ", "eta" => "η",
    "theta" => "θ", "vartheta" => "ϑ", "iota" => "ι", "kappa" => "κ",
    "lambda" => "λ", "mu" => "μ", "nu" => "ν", "xi" => "ξ",
    "pi" => "π", "varpi" => "ϖ", "rho" => "ρ", "varrho" => "ϱ",
    "sigma" => "σ", "varsigma" => "ς", "tau" => "τ", "upsilon" => "υ",
    "phi" => "ϕ", "varphi" => "φ", "chi" => "χ", "psi" => "ψ", "omega" => "ω",
    // Greek uppercase
    "Gamma" => "Γ", "Delta" => "Δ", "Theta" => "Θ", "Lambda" => "Λ",
    "Xi" => "Ξ", "Pi" => "Π", "Sigma" => "Σ", "Upsilon" => "Υ",
    "Phi" => "Φ", "Psi" => "Ψ", "Omega" => "Ω",
    // Relations
    "leq" => "≤", "le" => "≤", "geq" => "≥", "ge" => "≥", "neq" => "≠", "ne" => "≠",
    "approx" => "≈", "equiv" => "≡", "sim" => "∼", "simeq" => "≃", "cong" => "≅",
    "propto" => "∝", "ll" => "≪", "gg" => "≫", "prec" => "≺", "succ" => "≻",
    "in" => "∈", "notin" => "∉", "ni" => "∋", "subset" => "⊂", "supset" => "⊃",
    "subseteq" => "⊆", "supseteq" => "⊇", "perp" => "⊥", "parallel" => "∥",
    "mid" => "∣", "models" => "⊨", "vdash" => "⊢",
    // Binary operators
    "pm" => "±", "mp" => "∓", "times" => "×", "div" => "÷", "cdot" => "⋅",
    "ast" => "∗", "star" => "⋆", "circ" => "∘", "bullet" => "∙",
    "cap" => "∩", "cup" => "∪", "wedge" => "∧", "land" => "∧", "vee" => "∨", "lor" => "∨",
    "oplus" => "⊕", "otimes" => "⊗", "odot" => "⊙", "setminus" => "∖",
    // Arrows
    "to" => "→", "rightarrow" => "→", "leftarrow" => "←", "gets" => "←",
    "leftrightarrow" => "↔", "Rightarrow" => "⇒", "Leftarrow" => "⇐",
    "Leftrightarrow" => "⇔", "implies" => "⟹", "iff" => "⟺", "impliedby" => "⟸",
    "mapsto" => "↦", "longrightarrow" => "⟶", "longleftarrow" => "⟵",
    "hookrightarrow" => "↪", "uparrow" => "↑", "downarrow" => "↓",
    // Miscellaneous
    "infty" => "∞", "partial" => "∂", "nabla" => "∇", "forall" => "∀",
    "exists" => "∃", "nexists" => "∄", "emptyset" => "∅", "varnothing" => "∅",
    "neg" => "¬", "lnot" => "¬", "angle" => "∠", "triangle" => "△",
    "hbar" => "ℏ", "ell" => "ℓ", "Re" => "ℜ", "Im" => "ℑ", "aleph" => "ℵ",
    "prime" => "′", "dagger" => "†", "ddagger" => "‡",
    "cdots" => "⋯", "ldots" => "…", "dots" => "…", "vdots" => "⋮", "ddots" => "⋱",
    "langle" => "⟨", "rangle" => "⟩", "lfloor" => "⌊", "rfloor" => "⌋",
    "lceil" => "⌈", "rceil" => "⌉", "vert" => "|", "Vert" => "‖",
    // Escaped punctuation
    "{" => "{", "}" => "}", "$" => "$", "%" => "%", "&" => "&",
    "#" => "#", "_" => "_", "|" => "‖",
};
