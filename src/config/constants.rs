pub mod compile_time {
    pub mod lexical {
        /// Maximum number of tokens produced for a single input stream
        /// SECURITY: Prevents token explosion from hostile input
        pub const MAX_TOKEN_COUNT: usize = 1_000_000;

        /// Maximum `#file` nesting depth tracked by the lexer
        /// RESOURCE: Bounds the include-origin stack
        pub const MAX_INCLUDE_DEPTH: usize = 1_000;
    }

    pub mod simplify {
        /// Maximum iterations of the fixpoint pass cluster
        /// RESOURCE: Safety valve for a non-converging rewrite cycle;
        /// unreachable for well-formed input
        pub const MAX_FIXPOINT_ITERATIONS: usize = 1_000;
    }

    pub mod logging {
        /// Maximum events retained per file by the collector
        /// RESOURCE: Prevents unbounded error accumulation
        pub const MAX_EVENTS_PER_FILE: usize = 1_000;
    }
}
