//! Embed URL construction.
//!
//! The URL reproduces a known-good Compiler Explorer layout: a source editor
//! pane next to an executor pane with the `mp-units` library (trunk) enabled.
//! Only the source, compiler id and options spans vary; every other byte is
//! part of the contract with the service.

use crate::encode::{encode_flags, encode_payload};

/// Base of the embed endpoint.
pub const EMBED_ENDPOINT: &str = "https://godbolt.org/e";

/// Layout up to the editor's `source:` value.
const LAYOUT_HEAD: &str = "?hideEditorToolbars=true#g:!((g:!((g:!((h:codeEditor,i:(\
filename:'1',fontScale:15,fontUsePx:'0',j:1,lang:c%2B%2B,\
selection:(endColumn:1,endLineNumber:1,positionColumn:1,positionLineNumber:1,\
selectionStartColumn:1,selectionStartLineNumber:1,startColumn:1,startLineNumber:1),\
source:'";

/// From the end of the source to the executor's `compiler:` value.
const LAYOUT_BEFORE_COMPILER: &str = "'),l:'5',n:'0',o:'C%2B%2B+source+%231',t:'0')),\
k:100,l:'4',m:65.44554455445545,n:'0',o:'',s:0,t:'0'),\
(g:!((h:executor,i:(argsPanelShown:'1',compilationPanelShown:'1',compiler:";

/// From the compiler id to the executor's `options:` value.
const LAYOUT_BEFORE_OPTIONS: &str = ",compilerName:'',compilerOutShown:'0',execArgs:'',\
execStdin:'',fontScale:16,fontUsePx:'0',j:1,lang:c%2B%2B,\
libs:!((name:mp-units,ver:trunk)),options:'";

/// Remainder of the layout after the options.
const LAYOUT_TAIL: &str = "',overrides:!(),runtimeTools:!(),source:1,stdinPanelShown:'1',\
wrap:'0'),l:'5',n:'0',o:'Executor+x86-64+clang+21.1.0+(C%2B%2B,+Editor+%231)',t:'0')),\
header:(),l:'4',m:34.554455445544555,n:'0',o:'',s:0,t:'0')),l:'3',n:'0',o:'',t:'0')),\
version:4";

/// Build the embed URL for a code block.
///
/// `code` is encoded with [`encode_payload`], `flags` with [`encode_flags`];
/// `compiler` is inserted verbatim. Never fails, whatever the input.
///
/// ```
/// use ce_embed::build_url;
///
/// let url = build_url("int main() {}\n", "gcc1510", "-O2");
/// assert!(url.starts_with("https://godbolt.org/e?hideEditorToolbars=true#"));
/// assert!(url.contains("source:'int+main()+%7B%7D'"));
/// assert!(url.contains("compiler:gcc1510,"));
/// assert!(url.contains("options:'-O2'"));
/// ```
#[must_use]
pub fn build_url(code: &str, compiler: &str, flags: &str) -> String {
    let source = encode_payload(code);
    let options = encode_flags(flags);

    let mut url = String::with_capacity(
        EMBED_ENDPOINT.len()
            + LAYOUT_HEAD.len()
            + LAYOUT_BEFORE_COMPILER.len()
            + LAYOUT_BEFORE_OPTIONS.len()
            + LAYOUT_TAIL.len()
            + source.len()
            + compiler.len()
            + options.len(),
    );
    url.push_str(EMBED_ENDPOINT);
    url.push_str(LAYOUT_HEAD);
    url.push_str(&source);
    url.push_str(LAYOUT_BEFORE_COMPILER);
    url.push_str(compiler);
    url.push_str(LAYOUT_BEFORE_OPTIONS);
    url.push_str(&options);
    url.push_str(LAYOUT_TAIL);
    url
}
