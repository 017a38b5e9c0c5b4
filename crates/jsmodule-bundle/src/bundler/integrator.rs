use crate::bundler::extractor::Extractor;
use crate::bundler::parser::DirectiveParser;
use crate::bundler::registry::UnitRegistry;
use crate::bundler::unit::{banner, BannerKind};
use tracing::{debug, warn};

/// Swaps the content of registered units for externally supplied sources
pub struct ReplacementIntegrator<'a> {
    extractor: &'a Extractor,
    parser: &'a DirectiveParser,
    strip_debug: bool,
}

impl<'a> ReplacementIntegrator<'a> {
    pub fn new(extractor: &'a Extractor, parser: &'a DirectiveParser, strip_debug: bool) -> Self {
        Self {
            extractor,
            parser,
            strip_debug,
        }
    }

    /// Apply one replacement source; `origin` only appears in the banner.
    ///
    /// For every name the replacement provides, the current owner of that
    /// name takes over the replacement's header, body, provides and
    /// requires. Names without an owner are ignored, so a replacement never
    /// introduces a new unit. Returns how many owners were rewritten.
    pub fn integrate(&self, registry: &mut UnitRegistry, text: &str, origin: &str) -> usize {
        let extracted = self.extractor.split_script(text);
        if extracted.malformed {
            warn!("Replacement {} has no recognisable module wrapper", origin);
        }

        let (header, body) = if self.strip_debug {
            (
                self.extractor.strip_debug(&extracted.header),
                self.extractor.strip_debug(&extracted.body),
            )
        } else {
            (extracted.header, extracted.body)
        };
        let body = format!("{}{}", banner(BannerKind::Replacement, origin), body);
        let directives = self.parser.parse(&header);

        let mut replaced = 0;
        for name in &directives.provides {
            match registry.owner_of(name) {
                Some(owner) => {
                    registry.replace_content(
                        owner,
                        &header,
                        &body,
                        &directives.provides,
                        &directives.requires,
                    );
                    debug!("Replaced module {} with {}", name, origin);
                    replaced += 1;
                }
                None => debug!("Replacement {} provides unknown module {}", origin, name),
            }
        }

        if replaced == 0 {
            warn!("Replacement {} matched no registered module", origin);
        }
        replaced
    }
}
