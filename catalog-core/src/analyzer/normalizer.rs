#[inline(always)]
const fn is_ascii_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\n' | b'\t' | b'\r')
}

/// Configuration options for text normalization.
///
/// The default configuration only folds accents, which keeps the output the
/// same length (in characters) as the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Lower-cases every character after folding.
    pub lowercase: bool,
    /// Collapses runs of ASCII whitespace into a single space and trims both ends.
    pub collapse_whitespace: bool,
}

impl NormalizerConfig {
    /// Settings used to prepare lookup queries.
    pub const fn query() -> Self {
        Self {
            lowercase: true,
            collapse_whitespace: true,
        }
    }
}

/// Accent-folding text normalizer.
///
/// Replaces accented Latin letters (`à á â ã ä ç è é ê ë ì í î ï ñ ò ó ô õ ö
/// ù ú û ü ý ÿ` and their uppercase forms) with their base letter, keeping
/// case. Every other character passes through. Optionally lower-cases and
/// collapses whitespace, see [`NormalizerConfig`].
///
/// # Examples
///
/// ```
/// use catalog_core::analyzer::normalizer::{NormalizerConfig, TextNormalizer};
///
/// let folder = TextNormalizer::default();
/// assert_eq!(folder.normalize("Évaluer à Nîmes"), "Evaluer a Nimes");
///
/// let query = TextNormalizer::new(NormalizerConfig::query());
/// assert_eq!(query.normalize("  Gestion   DE Crise "), "gestion de crise");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    /// Creates a new normalizer with the specified configuration.
    pub const fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    pub const fn config(&self) -> NormalizerConfig {
        self.config
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Clears the buffer before writing and reuses its capacity when possible.
    #[inline]
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());

        let NormalizerConfig {
            lowercase,
            collapse_whitespace,
        } = self.config;

        if !lowercase && !collapse_whitespace {
            fold_into(input, out);
            return;
        }

        // Starting "after a space" drops leading whitespace.
        let mut prev_space = true;

        for ch in input.chars() {
            if collapse_whitespace && ch.is_ascii() && is_ascii_ws(ch as u8) {
                if !prev_space {
                    out.push(' ');
                    prev_space = true;
                }
                continue;
            }

            let folded = fold_accent(ch);
            if lowercase {
                out.extend(folded.to_lowercase());
            } else {
                out.push(folded);
            }
            prev_space = false;
        }

        if collapse_whitespace && out.ends_with(' ') {
            out.pop();
        }
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }
}

/// Folds accents out of `input` with the default normalizer.
///
/// Total, length preserving and idempotent.
#[inline]
pub fn normalize(input: &str) -> String {
    TextNormalizer::default().normalize(input)
}

/// Copies ASCII runs wholesale and folds the rest char by char.
fn fold_into(input: &str, out: &mut String) {
    let mut rest = input;
    while !rest.is_empty() {
        let ascii_len = rest
            .bytes()
            .position(|b| !b.is_ascii())
            .unwrap_or(rest.len());
        out.push_str(&rest[..ascii_len]);
        rest = &rest[ascii_len..];

        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(fold_accent(ch));
            rest = chars.as_str();
        }
    }
}

/// Maps an accented Latin letter to its base letter, preserving case.
#[inline(always)]
pub fn fold_accent(c: char) -> char {
    match c {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' => 'A',
        'à' | 'á' | 'â' | 'ã' | 'ä' => 'a',

        'Ç' => 'C',
        'ç' => 'c',

        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'è' | 'é' | 'ê' | 'ë' => 'e',

        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ì' | 'í' | 'î' | 'ï' => 'i',

        'Ñ' => 'N',
        'ñ' => 'n',

        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',

        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ù' | 'ú' | 'û' | 'ü' => 'u',

        'Ý' | 'Ÿ' => 'Y',
        'ý' | 'ÿ' => 'y',

        _ => c,
    }
}
