use taskbar_core::{
    ListItem, ListItemError, ListItemKind, PropertyStore, VariantValue, INFOTIPSIZE, MAX_PATH,
    TITLE,
};

#[test]
fn display_name_reads_back() {
    let item = ListItem::create_with_arguments("56", "newTask3").unwrap();
    assert_eq!(item.display_name(), "newTask3");
}

#[test]
fn empty_display_name_is_empty_text() {
    let item = ListItem::create_with_arguments("78", "").unwrap();
    assert!(item.display_name().is_empty());
}

#[test]
fn arguments_read_back_without_padding() {
    let item = ListItem::create_with_arguments("910", "newTask4").unwrap();
    assert_eq!(item.arguments(), "910");
    assert_eq!(item.display_name(), "newTask4");
    assert_eq!(item.kind(), ListItemKind::Arguments);
}

#[test]
fn target_is_current_executable() {
    let item = ListItem::create_with_arguments("1", "task").unwrap();
    let exe = std::env::current_exe().unwrap();
    assert_eq!(item.link().path(), exe.as_path());
}

#[test]
fn setters_replace_values() {
    let mut item = ListItem::create_with_target("C:/apps/tool.exe", "--a", "first").unwrap();
    item.set_display_name("second").unwrap();
    item.set_arguments("--b --c").unwrap();
    item.set_description("does things").unwrap();
    item.set_logo_path("C:/apps/tool.ico").unwrap();
    item.set_group_name("Tools");

    assert_eq!(item.display_name(), "second");
    assert_eq!(item.arguments(), "--b --c");
    assert_eq!(item.description(), "does things");
    assert_eq!(item.logo_path(), "C:/apps/tool.ico");
    assert_eq!(item.group_name(), "Tools");
}

#[test]
fn defaults_are_empty() {
    let item = ListItem::create_with_target("C:/apps/tool.exe", "", "t").unwrap();
    assert_eq!(item.group_name(), "");
    assert_eq!(item.description(), "");
    assert_eq!(item.logo_path(), "");
}

#[test]
fn separator_has_no_title_or_arguments() {
    let mut separator = ListItem::create_separator().unwrap();
    assert!(separator.is_separator());
    assert_eq!(separator.kind(), ListItemKind::Separator);
    assert_eq!(separator.display_name(), "");
    assert_eq!(separator.arguments(), "");

    assert!(matches!(
        separator.set_display_name("nope"),
        Err(ListItemError::SeparatorNotEditable(_))
    ));
    assert!(matches!(
        separator.set_arguments("1"),
        Err(ListItemError::SeparatorNotEditable(_))
    ));

    let record = separator.record().unwrap();
    assert!(record.separator);
    assert!(record.title.is_empty());
}

#[test]
fn oversized_text_is_invalid_argument() {
    let mut item = ListItem::create_with_target("C:/apps/tool.exe", "", "t").unwrap();

    let description = "d".repeat(INFOTIPSIZE);
    let err = item.set_description(&description).unwrap_err();
    assert!(matches!(
        err,
        ListItemError::InvalidArgument {
            field: "description",
            len,
            max,
        } if len == INFOTIPSIZE && max == INFOTIPSIZE - 1
    ));

    let longest = "a".repeat(INFOTIPSIZE - 1);
    item.set_arguments(&longest).unwrap();
    assert_eq!(item.arguments(), longest);

    let icon = "i".repeat(MAX_PATH);
    assert!(item.set_logo_path(&icon).is_err());
}

#[test]
fn display_name_rejects_interior_nul() {
    let err = ListItem::create_with_target("C:/apps/tool.exe", "", "bad\0name").unwrap_err();
    assert!(matches!(err, ListItemError::Variant(_)));
}

#[test]
fn link_text_rejects_interior_nul() {
    let err = ListItem::create_with_target("C:/apps/tool.exe", "a\0b", "name").unwrap_err();
    assert!(matches!(
        err,
        ListItemError::InteriorNul { field: "arguments" }
    ));

    let mut item = ListItem::create_with_target("C:/apps/tool.exe", "a", "name").unwrap();
    assert!(matches!(
        item.set_arguments("x\0y"),
        Err(ListItemError::InteriorNul { .. })
    ));
    assert!(matches!(
        item.set_description("d\0"),
        Err(ListItemError::InteriorNul { .. })
    ));
    assert!(matches!(
        item.set_logo_path("C:/a\0.ico"),
        Err(ListItemError::InteriorNul { .. })
    ));
    assert_eq!(item.arguments(), "a", "rejected writes leave the old value");
    assert_eq!(item.description(), "");
}

#[test]
fn uncommitted_properties_block_snapshot() {
    let mut item = ListItem::create_with_target("C:/apps/tool.exe", "1", "old").unwrap();
    item.properties_mut()
        .set_value(TITLE, VariantValue::from_string("new").unwrap())
        .unwrap();

    assert_eq!(item.display_name(), "old", "staged title is not visible yet");
    assert!(matches!(
        item.record(),
        Err(ListItemError::UncommittedProperties)
    ));

    item.properties_mut().commit().unwrap();
    assert_eq!(item.record().unwrap().title, "new");
}

#[test]
fn record_and_rebuild_preserve_link_state() {
    let mut item = ListItem::create_with_target("C:/apps/tool.exe", "--open 3", "Open").unwrap();
    item.set_description("Open project 3").unwrap();
    item.set_logo_path("C:/apps/tool.ico").unwrap();

    let record = item.record().unwrap();
    assert_eq!(record.arguments, "--open 3");
    assert_eq!(record.title, "Open");
    assert_eq!(record.icon.as_ref().map(|icon| icon.index), Some(0));

    let rebuilt = ListItem::from_record(&record, "Projects").unwrap();
    assert_eq!(rebuilt.group_name(), "Projects");
    assert_eq!(rebuilt.record().unwrap(), record);
}
