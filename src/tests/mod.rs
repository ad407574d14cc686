#[cfg(test)]
mod rendering_tests {
    use crate::parser::{parse_document, Element, MemberKind};
    use crate::renderer::{
        remove_redundant_line_breaks, CollectedWarnings, ConvertOptions, MarkdownRenderer,
        MemberIndex, PresentationMode, Render, RenderContext, UnexpectedTagAction,
    };
    use crate::resolver::{MockTypeResolver, OpenResolver, TypeDescriptor, TypeResolver};
    use crate::ConvertError;

    fn options(unexpected_tags: UnexpectedTagAction) -> ConvertOptions {
        ConvertOptions {
            unexpected_tags,
            ..ConvertOptions::default()
        }
    }

    fn render(xml: &str, options: ConvertOptions) -> String {
        render_with(xml, options, &OpenResolver)
    }

    fn render_with(xml: &str, options: ConvertOptions, resolver: &dyn TypeResolver) -> String {
        let document = parse_document(xml).unwrap();
        let warnings = CollectedWarnings::default();
        MarkdownRenderer::new(options, resolver, &warnings)
            .render(&document)
            .unwrap()
    }

    fn doc(members: &str) -> String {
        format!(
            "<?xml version=\"1.0\"?>\n<doc>\n<assembly><name>Foo</name></assembly>\n<members>\n{}\n</members>\n</doc>",
            members
        )
    }

    #[test]
    fn document_header_and_type_section() {
        let md = render(
            &doc(r#"<member name="T:Foo.Bar"><summary>A bar.</summary></member>"#),
            ConvertOptions::default(),
        );

        assert!(md.starts_with("# Foo\n"));
        assert!(md.contains("\n---\n## Foo.Bar\n\n"));
        assert!(md.contains("A bar.\n\n"));
    }

    #[test]
    fn method_signature_under_first_method_header() {
        let md = render(
            &doc(
                r#"<member name="M:Foo.Bar.Baz(System.Int32,System.String)">
                    <param name="x">The x.</param>
                    <param name="y">The y.</param>
                </member>"#,
            ),
            ConvertOptions::default(),
        );

        assert!(md.contains("#### Methods:\n\n##### Baz(int x, String y)\n"));
        assert!(md.contains("|Name | Description |\n|-----|------|\n|x|The x.|\n"));
        assert!(md.contains("|y|The y.|\n"));
        assert_eq!(md.matches("|Name | Description |").count(), 1);
    }

    #[test]
    fn one_header_per_run_of_members() {
        let md = render(
            &doc(
                r#"<member name="M:Foo.Bar.One"/>
                <member name="M:Foo.Bar.Two"/>
                <member name="M:Foo.Bar.#ctor"/>
                <member name="M:Foo.Bar.Three"/>"#,
            ),
            ConvertOptions::default(),
        );

        assert_eq!(md.matches("#### Methods:").count(), 2);
        assert_eq!(md.matches("#### Constructors:").count(), 1);

        let one = md.find("##### One()").unwrap();
        let two = md.find("##### Two()").unwrap();
        let ctor = md.find("##### Bar()").unwrap();
        let three = md.find("##### Three()").unwrap();
        let headers: Vec<usize> = md.match_indices("#### Methods:").map(|(i, _)| i).collect();
        let ctor_header = md.find("#### Constructors:").unwrap();

        assert!(headers[0] < one && one < two);
        assert!(two < ctor_header && ctor_header < ctor);
        assert!(ctor < headers[1] && headers[1] < three);
    }

    #[test]
    fn fields_and_properties_render_as_tables() {
        let md = render(
            &doc(
                r#"<member name="T:Foo.Bar"/>
                <member name="F:Foo.Bar.Count"><summary>How many.</summary></member>
                <member name="F:Foo.Bar.Limit"><summary>The most.</summary></member>
                <member name="P:Foo.Bar.Name"><summary>The name.</summary></member>"#,
            ),
            ConvertOptions::default(),
        );

        assert_eq!(md.matches("#### Fields:").count(), 1);
        assert_eq!(md.matches("#### Properties:").count(), 1);
        assert!(md.contains("|Count|F|How many.|"));
        assert!(md.contains("|Limit|F|The most.|"));
        assert!(md.contains("|Name|P|The name.|"));
    }

    #[test]
    fn missing_field_type_renders_kind_letter() {
        let mut resolver = MockTypeResolver::new();
        resolver.expect_is_public().returning(|_| true);
        resolver.expect_resolve_type().returning(|_, _, _| None);

        let md = render_with(
            &doc(r#"<member name="F:Foo.Bar.Count"/>"#),
            options(UnexpectedTagAction::Error),
            &resolver,
        );
        assert!(md.contains("|Count|F||"));
    }

    #[test]
    fn resolved_property_type_is_linked() {
        let mut resolver = MockTypeResolver::new();
        resolver.expect_is_public().returning(|_| true);
        resolver
            .expect_resolve_type()
            .withf(|class, kind, member| {
                class == "Foo.Bar" && *kind == MemberKind::Property && member == "Owner"
            })
            .returning(|_, _, _| Some(TypeDescriptor::new("Foo.Models", "Person").in_assembly("Foo")));

        let md = render_with(
            &doc(r#"<member name="P:Foo.Bar.Owner"><summary>Who owns it.</summary></member>"#),
            ConvertOptions::default(),
            &resolver,
        );
        assert!(md.contains("|Owner|[Person](../Foo/#modelsperson)|Who owns it.|"));
    }

    #[test]
    fn hidden_members_are_skipped_and_do_not_break_runs() {
        let mut resolver = MockTypeResolver::new();
        resolver
            .expect_is_public()
            .returning(|id| !id.raw.contains("Secret"));
        resolver.expect_resolve_type().returning(|_, _, _| None);

        let md = render_with(
            &doc(
                r#"<member name="M:Foo.Bar.Open"/>
                <member name="P:Foo.Bar.Secret"><summary>Hidden.</summary></member>
                <member name="M:Foo.Bar.Close"/>"#,
            ),
            ConvertOptions::default(),
            &resolver,
        );

        assert!(!md.contains("Secret"));
        assert!(!md.contains("Hidden."));
        assert_eq!(md.matches("#### Methods:").count(), 1);
        assert!(md.contains("##### Close()"));
    }

    #[test]
    fn constructors_are_always_visible() {
        let mut resolver = MockTypeResolver::new();
        resolver.expect_is_public().returning(|_| false);
        resolver.expect_resolve_type().returning(|_, _, _| None);

        let md = render_with(
            &doc(r#"<member name="M:Foo.Bar.#ctor(System.Int64)"><param name="seed"/></member>"#),
            ConvertOptions::default(),
            &resolver,
        );
        assert!(md.contains("#### Constructors:\n\n##### Bar(long seed)"));
    }

    #[test]
    fn unknown_tag_is_accepted_silently() {
        let with_unknown = render(
            &doc(r#"<member name="T:Foo.Bar"><summary>Before <blink>x</blink> after.</summary></member>"#),
            options(UnexpectedTagAction::Accept),
        );
        let with_empty = render(
            &doc(r#"<member name="T:Foo.Bar"><summary>Before <name/> after.</summary></member>"#),
            options(UnexpectedTagAction::Accept),
        );
        assert_eq!(with_unknown, with_empty);
        assert!(with_unknown.contains("Before  after."));
    }

    #[test]
    fn unknown_tag_is_reported_as_warning() {
        let document = parse_document(&doc(
            r#"<member name="T:Foo.Bar"><summary><blink>x</blink></summary></member>"#,
        ))
        .unwrap();
        let warnings = CollectedWarnings::default();
        let md = MarkdownRenderer::new(options(UnexpectedTagAction::Warn), &OpenResolver, &warnings)
            .render(&document)
            .unwrap();

        assert!(!md.contains("blink"));
        let messages = warnings.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Unknown element type \"blink\" on line 5"));
    }

    #[test]
    fn first_unknown_tag_aborts_with_position() {
        let xml = doc(
            "<member name=\"T:Foo.Bar\">\n  <summary>\n    <blink/> <marquee/>\n  </summary>\n</member>",
        );
        let document = parse_document(&xml).unwrap();
        let warnings = CollectedWarnings::default();
        let result = MarkdownRenderer::new(options(UnexpectedTagAction::Error), &OpenResolver, &warnings)
            .render(&document);

        match result {
            Err(ConvertError::UnrecognizedTag { tag, line, column }) => {
                assert_eq!(tag, "blink");
                assert_eq!(line, 7);
                assert_eq!(column, 5);
            }
            other => panic!("expected UnrecognizedTag, got {:?}", other),
        }
    }

    #[test]
    fn summary_of_field_has_no_trailing_break() {
        let md = render(
            &doc(r#"<member name="F:Foo.Bar.Count"><summary>How many.</summary><remarks>More.</remarks></member>"#),
            ConvertOptions::default(),
        );
        assert!(md.contains("|Count|F|How many.\nMore.\n|"));
    }

    #[test]
    fn empty_remarks_show_member_name() {
        let md = render(
            &doc(r#"<member name="M:Foo.Bar.Spin(System.Int32)"><param name="turns"/><remarks/></member>"#),
            ConvertOptions::default(),
        );
        assert!(md.contains("|turns|Turns|\nSpin"));
    }

    #[test]
    fn inline_formatting() {
        let md = render(
            &doc(
                r#"<member name="T:Foo.Bar"><summary>Use <c>Run</c> with <b>care</b>.<para>Second.</para></summary></member>"#,
            ),
            ConvertOptions::default(),
        );
        assert!(md.contains("Use  `Run`  with **care**.  \n Second.  "));
    }

    #[test]
    fn see_also_list_gets_one_title() {
        let md = render(
            &doc(
                r#"<member name="T:Foo.Bar">
                    <seealso cref="T:Foo.Baz"/>
                    <seealso cref="T:Foo.Qux"/>
                </member>"#,
            ),
            ConvertOptions::default(),
        );
        assert_eq!(md.matches("See also:").count(), 1);
        assert!(md.contains("- [Baz](../Foo/#baz)"));
        assert!(md.contains("- [Qux](../Foo/#qux)"));
    }

    #[test]
    fn single_page_links_are_anchors() {
        let md = render(
            &doc(
                r#"<member name="M:Foo.Bar.Baz(System.Int32,System.String)">
                    <param name="x"/><param name="y"/>
                </member>
                <member name="T:Foo.Other"><summary>See <see cref="M:Foo.Bar.Baz(System.Int32,System.String)"/>.</summary></member>"#,
            ),
            ConvertOptions {
                mode: PresentationMode::SinglePage,
                ..ConvertOptions::default()
            },
        );
        assert!(md.contains("[Baz(int x, String y)](#bazint-x-string-y)"));
    }

    #[test]
    fn exception_and_langword() {
        let md = render(
            &doc(
                r#"<member name="M:Foo.Bar.Open">
                    <summary>Returns <see langword="null"/> when closed.</summary>
                    <exception cref="T:System.InvalidOperationException">When broken.</exception>
                </member>"#,
            ),
            ConvertOptions::default(),
        );
        assert!(md.contains("Returns  `null`  when closed."));
        assert!(md.contains("**Throws:** [InvalidOperationException](../System/#invalidoperationexception)"));
    }

    #[test]
    fn output_has_no_triple_line_breaks() {
        let md = render(
            &doc(
                r#"<member name="T:Foo.Bar"><summary>A.</summary><remarks>B.</remarks><example>C.</example></member>
                <member name="M:Foo.Bar.Run"><summary>Runs.</summary><returns>nothing</returns></member>"#,
            ),
            ConvertOptions::default(),
        );
        assert!(!md.contains("\n\n\n"));
        assert_eq!(remove_redundant_line_breaks(&md), md);
    }

    #[test]
    fn namespace_members_render_nothing() {
        let md = render(
            &doc(r#"<member name="N:Foo.Things"><summary>Namespace docs.</summary></member>"#),
            ConvertOptions::default(),
        );
        assert!(!md.contains("Namespace docs."));
    }

    #[test]
    fn unknown_prefix_letter_renders_nothing() {
        let md = render(
            &doc(r#"<member name="X:Foo.Bar"><summary>Unknown kind.</summary></member>"#),
            options(UnexpectedTagAction::Error),
        );
        assert!(!md.contains("Unknown kind."));
    }

    #[test]
    fn malformed_method_keeps_raw_name_and_body() {
        let md = render(
            &doc(r#"<member name="M:Foo.Bar.Broken("><summary>Still here.</summary></member>"#),
            options(UnexpectedTagAction::Error),
        );
        assert!(md.starts_with("# Foo"));
        assert!(md.contains("#### Methods:\n\n##### M:Foo.Bar.Broken(\nStill here."));
    }

    #[test]
    fn unprefixed_identifier_renders_as_type_section() {
        let md = render(
            &doc(r#"<member name="Foo.Bar.Baz"><summary>Still here.</summary></member>"#),
            options(UnexpectedTagAction::Error),
        );
        assert!(md.contains("\n---\n## Foo.Bar.Baz\n\nStill here."));
    }

    #[test]
    fn malformed_members_keep_params_and_runs() {
        let md = render(
            &doc(concat!(
                r#"<member name="M:Foo.Bar.Baz(System.Int32"><summary>Still here.</summary>"#,
                r#"<param name="x">An x.</param></member>"#,
                r#"<member name="M:Foo.Bar.Qux"><summary>Next.</summary></member>"#,
            )),
            options(UnexpectedTagAction::Error),
        );
        assert!(md.contains("##### M:Foo.Bar.Baz(System.Int32\nStill here."));
        assert!(md.contains("|x|An x.|"));
        assert!(md.contains("##### Qux()"));
        assert_eq!(md.matches("#### Methods:").count(), 1);
    }

    #[test]
    fn standalone_nodes_render_through_the_trait() {
        let document = parse_document(&doc("")).unwrap();
        let members = MemberIndex::new(&document);
        let warnings = CollectedWarnings::default();
        let context = RenderContext::new(ConvertOptions::default(), &OpenResolver, &warnings, &members)
            .with_assembly_name("Foo");

        let bold = Element::new("b").with_text("loud\n   text");
        assert_eq!(bold.render(&context).unwrap(), "**loud text**");

        let children = Element::new("summary")
            .with_child(Element::new("param").with_attr("name", "a"))
            .with_child(Element::new("param").with_attr("name", "b"));
        let table = children.children.as_slice().render(&context).unwrap();
        assert_eq!(table.matches("|Name | Description |").count(), 1);
    }
}
