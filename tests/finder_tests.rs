//! Reference finder tests.
//!
//! The workspace and tool are replaced by recording doubles so that save
//! ordering, notices and query arguments can be observed directly.

#[cfg(test)]
mod tests {
    use go_references::document::{OffsetEncoding, Position, TextDocument};
    use go_references::references::{ReferenceFinder, ReferenceRequest};
    use go_references::tool::{
        DecodeMode, ReferenceTool, SearchQuery, ToolConfig, ToolOutput, INSTALL_NOTICE,
    };
    use go_references::workspace::Workspace;
    use go_references::{ReferencesError, Result};
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    type Events = Rc<RefCell<Vec<&'static str>>>;

    struct RecordingWorkspace {
        root: PathBuf,
        dirty: bool,
        save_fails: bool,
        events: Events,
        notices: RefCell<Vec<String>>,
    }

    impl Workspace for RecordingWorkspace {
        fn root(&self) -> &Path {
            &self.root
        }

        fn any_dirty(&self) -> bool {
            self.dirty
        }

        fn save_all(&self) -> Result<()> {
            self.events.borrow_mut().push("save");
            if self.save_fails {
                return Err(ReferencesError::SaveFailed("read-only".to_string()));
            }
            Ok(())
        }

        fn show_information(&self, message: &str) {
            self.notices.borrow_mut().push(message.to_string());
        }
    }

    struct ScriptedTool {
        output: ToolOutput,
        events: Events,
        queries: RefCell<Vec<SearchQuery>>,
    }

    impl ReferenceTool for ScriptedTool {
        fn search(&self, query: &SearchQuery) -> Result<ToolOutput> {
            self.events.borrow_mut().push("search");
            self.queries.borrow_mut().push(query.clone());
            Ok(self.output.clone())
        }
    }

    struct BrokenTool;

    impl ReferenceTool for BrokenTool {
        fn search(&self, _query: &SearchQuery) -> Result<ToolOutput> {
            Err(ReferencesError::ToolFailed {
                program: PathBuf::from("/opt/go/bin/go-find-references"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    const SOURCE: &str = "package main\n\nfunc main() {\n\tgreet(\"x\")\n}\n";

    fn finder(
        dirty: bool,
        output: ToolOutput,
        config: ToolConfig,
    ) -> ReferenceFinder<RecordingWorkspace, ScriptedTool> {
        let events = Events::default();
        let workspace = RecordingWorkspace {
            root: PathBuf::from("/ws"),
            dirty,
            save_fails: false,
            events: Rc::clone(&events),
            notices: RefCell::new(Vec::new()),
        };
        let tool = ScriptedTool {
            output,
            events,
            queries: RefCell::new(Vec::new()),
        };
        ReferenceFinder::new(workspace, tool, config)
    }

    fn stdout(text: &str) -> ToolOutput {
        ToolOutput::Stdout(text.to_string())
    }

    fn main_go() -> TextDocument {
        TextDocument::new("/ws/pkg/main.go", SOURCE)
    }

    /// Cursor inside `greet` (columns 1..6 on line 3).
    fn on_greet() -> ReferenceRequest {
        ReferenceRequest::at(Position::new(3, 3))
    }

    #[test]
    fn clean_workspace_is_not_saved() {
        let finder = finder(false, stdout(""), ToolConfig::default());
        finder.find_references(&main_go(), &on_greet()).unwrap();

        assert_eq!(*finder.tool().events.borrow(), vec!["search"]);
    }

    #[test]
    fn dirty_workspace_is_saved_before_search() {
        let finder = finder(true, stdout(""), ToolConfig::default());
        finder.find_references(&main_go(), &on_greet()).unwrap();

        assert_eq!(*finder.tool().events.borrow(), vec!["save", "search"]);
    }

    #[test]
    fn failed_save_still_searches() {
        let events = Events::default();
        let workspace = RecordingWorkspace {
            root: PathBuf::from("/ws"),
            dirty: true,
            save_fails: true,
            events: Rc::clone(&events),
            notices: RefCell::new(Vec::new()),
        };
        let tool = ScriptedTool {
            output: stdout("foo.go:3:5\nextra\n"),
            events: Rc::clone(&events),
            queries: RefCell::new(Vec::new()),
        };
        let finder = ReferenceFinder::new(workspace, tool, ToolConfig::default());

        let refs = finder.find_references(&main_go(), &on_greet()).unwrap();
        assert_eq!(refs.map(|r| r.len()), Some(1));
        assert_eq!(*events.borrow(), vec!["save", "search"]);
    }

    #[test]
    fn query_carries_file_offset_and_root() {
        let finder = finder(false, stdout(""), ToolConfig::default());
        finder.find_references(&main_go(), &on_greet()).unwrap();

        let queries = finder.tool().queries.borrow();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].file, "/ws/pkg/main.go");
        assert_eq!(
            queries[0].offset,
            "package main\n\nfunc main() {\n\tgr".chars().count()
        );
        assert_eq!(queries[0].root, PathBuf::from("/ws"));
    }

    #[test]
    fn byte_offsets_count_utf8_bytes() {
        let config = ToolConfig::default().with_offset_encoding(OffsetEncoding::Bytes);
        let finder = finder(false, stdout(""), config);
        let doc = TextDocument::new("/ws/pkg/main.go", "// ñ\nfoo()\n");
        finder
            .find_references(&doc, &ReferenceRequest::at(Position::new(1, 1)))
            .unwrap();

        assert_eq!(finder.tool().queries.borrow()[0].offset, 7);
    }

    #[test]
    fn match_becomes_range_as_wide_as_cursor_word() {
        let finder = finder(false, stdout("foo.go:3:5\nextra-line\n"), ToolConfig::default());
        let doc = TextDocument::new("/ws/pkg/main.go", "x\n  abcd := 1\n");

        let refs = finder
            .find_references(&doc, &ReferenceRequest::at(Position::new(1, 3)))
            .unwrap()
            .expect("tool ran");

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].path, PathBuf::from("/ws/pkg/foo.go"));
        assert_eq!(refs[0].range.start, Position::new(3, 5));
        assert_eq!(refs[0].range.end, Position::new(3, 9));
    }

    #[test]
    fn unrecognised_lines_are_skipped() {
        let output = "warning: partial results\n-\nfoo.go:3:5\nextra\n";
        let finder = finder(false, stdout(output), ToolConfig::default());

        let refs = finder
            .find_references(&main_go(), &on_greet())
            .unwrap()
            .expect("tool ran");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].range.width(), 5);
    }

    #[test]
    fn missing_tool_notifies_once_and_returns_none() {
        let finder = finder(false, ToolOutput::NotInstalled, ToolConfig::default());

        let result = finder.find_references(&main_go(), &on_greet()).unwrap();
        assert_eq!(result, None);

        let notices = finder.workspace().notices.borrow();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0], INSTALL_NOTICE);
    }

    #[test]
    fn windows_document_path_uses_forward_slashes() {
        let finder = finder(false, stdout(""), ToolConfig::default());
        let doc = TextDocument::new(r"C:\a\b.go", SOURCE);
        finder.find_references(&doc, &on_greet()).unwrap();

        assert_eq!(finder.tool().queries.borrow()[0].file, "C:/a/b.go");
    }

    #[test]
    fn windows_matches_resolve_against_canonical_directory() {
        let finder = finder(false, stdout("foo.go:3:5\nctx\n"), ToolConfig::default());
        let doc = TextDocument::new(r"C:\ws\pkg\main.go", SOURCE);

        let refs = finder
            .find_references(&doc, &on_greet())
            .unwrap()
            .expect("tool ran");
        assert_eq!(refs[0].path, PathBuf::from("C:/ws/pkg/foo.go"));
    }

    #[test]
    fn tool_failure_propagates() {
        let workspace = RecordingWorkspace {
            root: PathBuf::from("/ws"),
            dirty: false,
            save_fails: false,
            events: Events::default(),
            notices: RefCell::new(Vec::new()),
        };
        let finder = ReferenceFinder::new(workspace, BrokenTool, ToolConfig::default());

        let err = finder.find_references(&main_go(), &on_greet()).unwrap_err();
        assert_eq!(err.kind(), "ToolFailed");
        assert!(finder.workspace().notices.borrow().is_empty());
    }

    #[test]
    fn invalid_position_fails_before_search() {
        let finder = finder(false, stdout(""), ToolConfig::default());
        let err = finder
            .find_references(&main_go(), &ReferenceRequest::at(Position::new(40, 0)))
            .unwrap_err();

        assert_eq!(err.kind(), "InvalidPosition");
        assert!(finder.tool().queries.borrow().is_empty());
    }

    #[test]
    fn strict_decoding_surfaces_out_of_step_output() {
        let finder = finder(false, stdout("a.go:1:1\nb.go:2:2\n"), ToolConfig::default());
        let err = finder.find_references(&main_go(), &on_greet()).unwrap_err();
        assert_eq!(err.kind(), "MalformedOutput");
    }

    #[test]
    fn lenient_decoding_keeps_even_lines() {
        let config = ToolConfig::default().with_decode_mode(DecodeMode::Lenient);
        let finder = finder(false, stdout("a.go:1:1\nb.go:2:2\n"), config);

        let refs = finder
            .find_references(&main_go(), &on_greet())
            .unwrap()
            .expect("tool ran");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].path, PathBuf::from("/ws/pkg/a.go"));
    }

    #[test]
    fn cursor_off_word_gives_empty_ranges() {
        let finder = finder(false, stdout("foo.go:2:1\n-\n"), ToolConfig::default());
        let refs = finder
            .find_references(&main_go(), &ReferenceRequest::at(Position::new(1, 0)))
            .unwrap()
            .expect("tool ran");

        assert_eq!(refs[0].range.width(), 0);
    }
}
