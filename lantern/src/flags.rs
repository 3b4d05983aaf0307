use std::path::PathBuf;

xflags::xflags! {
    /// Drive HTML slide decks written as markdown talks.
    cmd lantern {
        /// Log every navigation step.
        optional -v, --verbose

        /// Print a talk's slides as HTML sections.
        cmd slides {
            /// The talk's markdown source.
            required talk: PathBuf
            /// Settings file. Defaults to `lantern.toml` beside the talk.
            optional -c, --config path: PathBuf
        }

        /// Print a talk's metadata as JSON.
        cmd info {
            /// The talk's markdown source.
            required talk: PathBuf
        }

        /// Replay keys and clicks read from stdin against a talk, printing
        /// the address fragment after each one.
        cmd drive {
            /// The talk's markdown source.
            required talk: PathBuf
            /// Settings file. Defaults to `lantern.toml` beside the talk.
            optional -c, --config path: PathBuf
            /// Initial address fragment, such as `slide-3`.
            optional --at fragment: String
        }
    }
}
