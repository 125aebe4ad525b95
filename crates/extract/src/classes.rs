//! Document class definitions: the closed entity/relationship vocabulary for
//! each kind of source text, plus the instruction template the model is
//! prompted with.

/// Schema for one document class. Labels and relation types are closed sets;
/// the validator rejects anything outside them.
#[derive(Debug, Clone)]
pub struct ClassSchema {
    pub class: &'static str,
    pub system_role: &'static str,
    pub entity_labels: &'static [&'static str],
    pub relation_types: &'static [&'static str],
    /// Instruction template with a `$ctext` placeholder for the document text.
    pub template: &'static str,
}

const SYSTEM_ROLE: &str = "You are a helpful IT-project and account management expert who extracts information from documents.";

/// The production document classes: project briefs, people profiles and
/// Slack message logs.
pub fn builtin_schemas() -> Vec<ClassSchema> {
    vec![
        ClassSchema {
            class: "project_briefs",
            system_role: SYSTEM_ROLE,
            entity_labels: &["Project", "Technology", "Client"],
            relation_types: &["USES_TECH", "HAS_CLIENT"],
            template: PROJECT_BRIEF_TEMPLATE,
        },
        ClassSchema {
            class: "people_profiles",
            system_role: SYSTEM_ROLE,
            entity_labels: &["Person", "Project", "Technology"],
            relation_types: &["HAS_SKILLS", "HAS_PEOPLE"],
            template: PEOPLE_PROFILE_TEMPLATE,
        },
        ClassSchema {
            class: "slack_messages",
            system_role: SYSTEM_ROLE,
            entity_labels: &["Person", "SlackMessage"],
            relation_types: &["SENT"],
            template: SLACK_MESSAGE_TEMPLATE,
        },
    ]
}

/// Look up a builtin schema by class name.
pub fn schema_for_class(class: &str) -> Option<ClassSchema> {
    builtin_schemas().into_iter().find(|s| s.class == class)
}

const PROJECT_BRIEF_TEMPLATE: &str = r#"
From the Project Brief below, extract the following Entities & relationships described in the mentioned format
0. ALWAYS FINISH THE OUTPUT. Never send partial responses
1. First, look for these Entity types in the text and generate as comma-separated format similar to entity type.
   `id` property of each entity must be alphanumeric and must be unique among the entities and ensure that all the ids are in lowercase. You will be referring this property to define the relationship between entities. Do not create new entity types that aren't mentioned below. Document must be summarized and stored inside Project entity under `summary` property. You will have to generate as many entities as needed as per the types below:
    Entity Types:
    label:'Project',id:string,name:string;summary:string //Project mentioned in the brief; `id` property is the full name of the project, in lowercase, with no capital letters, special characters, spaces or hyphens; Contents of original document must be summarized inside 'summary' property
    label:'Technology',id:string,name:string //Technology Entity; `id` property is the name of the technology, in camel-case. Identify as many of the technologies used as possible
    label:'Client',id:string,name:string;industry:string //Client that the project was done for; `id` property is the name of the Client, in camel-case; 'industry' is the industry that the client operates in, as mentioned in the project brief.

2. Next generate each relationships as triples of head, relationship and tail. To refer the head and tail entity, use their respective `id` property. They should follow these relationship types below. You will have to generate as many relationships as needed as defined below and ensure that all the ids are in lowercase:
    Relationship types:
    project|USES_TECH|technology
    project|HAS_CLIENT|client

3. The output should look like:
{
    "entities": [{"label":"Project","id":string,"name":string,"summary":string}],
    "relationships": ["project|USES_TECH|technology"]
}

an example with values:
{
  "entities": [
    {
      "label": "Project",
      "id": "prj101",
      "name": "Smart City Infrastructure",
      "summary": "A project focused on integrating IoT and AI to improve urban living through smart traffic systems, energy management, and public safety."
    },
    {
      "label": "Technology",
      "id": "tech001",
      "name": "Internet of Things"
    },
    {
      "label": "Technology",
      "id": "tech002",
      "name": "Artificial Intelligence"
    }
  ],
  "relationships": [
    "prj101|USES_TECH|tech001",
    "prj101|USES_TECH|tech002"
  ]
}

4. Extract all relevant entities and relationships from the following text. Return the result as a valid JSON object

Case Sheet:
$ctext
"#;

const PEOPLE_PROFILE_TEMPLATE: &str = r#"
From the list of people below, extract the following Entities & relationships described in the mentioned format
0. ALWAYS FINISH THE OUTPUT. Never send partial responses
1. First, look for these Entity types in the text and generate as comma-separated format similar to entity type.
   `id` property of each entity must be alphanumeric and must be unique among the entities and ensure that all the ids are in lowercase. You will be referring this property to define the relationship between entities. Do not create new entity types that aren't mentioned below. You will have to generate as many entities as needed as per the types below:
    Entity Types:
    label:'Person',id:string,name:string //Person that the data is about. `id` property is the name of the person, in camel-case. 'name' is the person's name, as spelled in the text.
    label:'Project',id:string,name:string;summary:string //Project mentioned in the profile; `id` property is the full lowercase name of the project, with no capital letters, special characters, spaces or hyphens.
    label:'Technology',id:string,name:string //Technology Entity, as listed in the "skills"-section of every person; `id` property is the name of the technology, in camel-case.

2. Next generate each relationships as triples of head, relationship and tail. To refer the head and tail entity, use their respective `id` property. They should follow these relationship types below. You will have to generate as many relationships as needed as defined below and ensure that all the ids are in lowercase:
    Relationship types:
    person|HAS_SKILLS|technology
    project|HAS_PEOPLE|person

The output should look like:
{
    "entities": [{"label":"Person","id":string,"name":string}],
    "relationships": ["project|HAS_PEOPLE|person"]
}

an example with values:
{
  "entities": [
    {
      "label": "Person",
      "id": "p001",
      "name": "Alice Johnson"
    },
    {
      "label": "Project",
      "id": "prj001",
      "name": "AI Research Initiative"
    }
  ],
  "relationships": [
    "prj001|HAS_PEOPLE|p001"
  ]
}

3. Extract all relevant entities and relationships from the following text. Return the result as a valid JSON object

Case Sheet:
$ctext
"#;

const SLACK_MESSAGE_TEMPLATE: &str = r#"
From the list of messages below, extract the following Entities & relationships described in the mentioned format
0. ALWAYS FINISH THE OUTPUT. Never send partial responses
1. First, look for these Entity types in the text and generate as comma-separated format similar to entity type.
   `id` property of each entity must be alphanumeric and must be unique among the entities and ensure that all the ids are in lowercase. You will be referring this property to define the relationship between entities. Do not create new entity types that aren't mentioned below. You will have to generate as many entities as needed as per the types below:
    Entity Types:
    label:'Person',id:string,name:string //Person that sent the message. `id` property is the name of the person, in camel-case; for example, "michaelClark", or "emmaMartinez"; 'name' is the person's name, as spelled in the text.
    label:'SlackMessage',id:string,text:string //The Slack-Message that was sent; 'id' property should be the message id, as spelled in the reference. 'text' property is the text content of the message, as spelled in the reference

2. Next generate each relationships as triples of head, relationship and tail. To refer the head and tail entity, use their respective `id` property. They should follow these relationship types below. You will have to generate as many relationships as needed as defined below and ensure that all the ids are in lowercase:
    Relationship types:
    person|SENT|slackmessage

The output should look like:
{
    "entities": [{"label":"SlackMessage","id":string,"text":string}],
    "relationships": ["person|SENT|slackmessage"]
}

an example with values:
{
  "entities": [
    {
      "label": "SlackMessage",
      "id": "msg001",
      "text": "Hey team, the deployment is scheduled for 3 PM today. Please be ready for testing."
    },
    {
      "label": "Person",
      "id": "user123",
      "name": "Jordan Lee"
    }
  ],
  "relationships": [
    "user123|SENT|msg001"
  ]
}

3. Extract all relevant entities and relationships from the following text. Return the result as a valid JSON object

Case Sheet:
$ctext
"#;
